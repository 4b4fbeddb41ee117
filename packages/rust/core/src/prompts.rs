//! Prompt templates sent to the chat model.

/// System role for outline generation.
pub const OUTLINE_SYSTEM: &str =
    "You are an expert Scala and ZIO programmer creating outlines for technical blog posts.";

/// System role for section expansion.
pub const SECTION_SYSTEM: &str =
    "You are an expert Scala and ZIO programmer writing detailed technical content.";

/// System role for standalone code samples.
pub const CODE_SAMPLE_SYSTEM: &str =
    "You are an expert Scala and ZIO programmer. Generate clean, idiomatic Scala code with ZIO.";

pub fn outline_user(topic: &str) -> String {
    format!(
        "Create a detailed outline for a blog post about {topic} using Scala and ZIO. \
         Include sections for introduction, main concepts, code examples, and conclusion."
    )
}

/// The full outline is embedded so the model keeps the section in context.
pub fn section_user(outline: &str, section: &str) -> String {
    format!(
        "Here is an outline for a blog post:\n\n{outline}\n\n\
         Please write detailed content for the section: {section}. \
         Include Scala and ZIO code examples where appropriate."
    )
}

pub fn code_sample_user(description: &str) -> String {
    format!(
        "Write a Scala code sample using ZIO for the following functionality:\n{description}\n\n\
         Only output the code, no explanations."
    )
}
