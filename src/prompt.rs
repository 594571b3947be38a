const HUMAN_TURN: &str = "\n\nHuman:";
const ASSISTANT_TURN: &str = "\n\nAssistant:";

/// Builds the code-review prompt for a single file's diff.
///
/// The patch is embedded verbatim. Text-completion models expect the
/// conversation to open with a human turn and end on an assistant turn.
pub fn build_review_prompt(patch: &str) -> String {
    format!(
        "{HUMAN_TURN} You are an expert software engineer giving a code review for the below code snippet:\n\n\
         {patch}\n\n\
         List:\n\
         1. Code quality issues\n\
         2. Potential bugs or security vulnerabilities\n\
         3. Recommendations to improve performance and readability.\
         {ASSISTANT_TURN}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_patch_verbatim() {
        let patch = "@@ -1,2 +1,2 @@\n-let x = 1;\n+let x = 2;";
        let prompt = build_review_prompt(patch);
        assert!(prompt.contains(patch));
    }

    #[test]
    fn prompt_is_framed_as_a_single_exchange() {
        let prompt = build_review_prompt("diff");
        assert!(prompt.starts_with("\n\nHuman: You are an expert software engineer"));
        assert!(prompt.ends_with("\n\nAssistant:"));
        assert_eq!(prompt.matches("Human:").count(), 1);
    }

    #[test]
    fn prompt_separates_patch_from_instructions() {
        let prompt = build_review_prompt("+added line");
        assert!(prompt.contains("code snippet:\n\n+added line\n\nList:\n1."));
    }

    #[test]
    fn prompt_lists_review_topics() {
        let prompt = build_review_prompt("diff");
        assert!(prompt.contains("1. Code quality issues"));
        assert!(prompt.contains("2. Potential bugs or security vulnerabilities"));
        assert!(prompt.contains("3. Recommendations to improve performance and readability."));
    }
}
