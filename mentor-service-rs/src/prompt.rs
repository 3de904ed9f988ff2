// mentor-service-rs/src/prompt.rs
// Prompt construction for the mentor feedback request

/// System-role instruction sent with every feedback request.
pub const MENTOR_SYSTEM_PROMPT: &str = "You are a strict but helpful coding interview mentor.";

/// Substituted when the submission carries no problem name.
pub const DEFAULT_PROBLEM_NAME: &str = "Unknown problem";

/// Substituted when the submission carries no pattern label.
pub const DEFAULT_PATTERN: &str = "unknown";

/// Build the user-role prompt for a submission.
///
/// The submitted code is interpolated verbatim inside the fenced block; no
/// truncation and no escaping. Empty metadata fields fall back to the named
/// defaults.
pub fn build_feedback_prompt(
    problem_name: Option<&str>,
    pattern: Option<&str>,
    code: &str,
) -> String {
    let problem = match problem_name {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_PROBLEM_NAME,
    };
    let pattern = match pattern {
        Some(label) if !label.is_empty() => label,
        _ => DEFAULT_PATTERN,
    };

    format!(
        "\nYou are an experienced coding interview mentor.\n\
A candidate is working on the following problem:\n\
\n\
Problem: {problem}\n\
Pattern: {pattern}\n\
\n\
Here is their solution code:\n\
\n\
```\n\
{code}\n\
```\n\
\n\
1. Identify the most likely algorithmic pattern being used.\n\
2. Point out any logical issues or edge cases the code might fail on.\n\
3. Comment on time and space complexity.\n\
4. Give 2 or 3 clear suggestions to improve the solution or explanation.\n\
\n\
Be concise but specific. Assume the candidate is smart but still learning patterns.\n"
    )
}
