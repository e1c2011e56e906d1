//! Instruction prompt sent with every prediction.

/// System message for every classification call.
pub const SYSTEM_PROMPT: &str =
    "You are a precise name classification assistant outputting only JSON.";

/// Builds the user prompt asking the model to judge `name`.
pub fn build_prompt(name: &str) -> String {
    format!(
        r#"You are an expert in name classification. Determine if the full name '{name}' is a realistic human full name, used in any culture. Consider the name regardless of its capitalization.

A full name is considered unrealistic if:
* It contains characters other than letters (a-z, A-Z), spaces, hyphens (-), and dots (.).
* It has fewer than three letters in total (excluding spaces, hyphens, and dots). For example, 'Ku' has two letters and is unrealistic.
* It contains consecutive hyphens (e.g., '--') or consecutive dots (e.g., '..').
* It has a dot ('.') without spaces around it, resembling an email address or username (e.g., 'm.ahmed', 'Ravi.kumar').
* It is a single word without a clear first and last name, unless it is a widely recognized full name in a specific culture. For example, 'Baba' is a single word and unrealistic, while 'Leonardo da Vinci' is realistic.

Examples of realistic full names: 'Mohiuddin Mohi', 'Aisha Khan', 'Sheik Kaykaus', 'Mr. Hanif Uddin', 'John-Doe', 'Mary. Anne Smith', 'm. a. h. hashan', 'p. k. robi mullah', 'Leonardo da Vinci'.
Examples of unrealistic names: 'Ku' (too short), 'Ghi' (single word), 'Baba' (single word), 'Wert' (keyboard pattern), 'Jahanara--Begum' (consecutive hyphens), 'Abdullah123' (contains numbers), 'Table Chair' (common phrase), 'Qwert' (keyboard pattern), 'Abdullah' (single word).

Respond in JSON format. If the full name is 'Realistic', the JSON should only contain:
{{"prediction": "Realistic"}}
If the name is 'Not Realistic', the JSON should contain:
{{"prediction": "Not Realistic", "reason": "<brief reason (max 50 characters) why the name is not realistic>"}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_name_and_both_labels() {
        let prompt = build_prompt("Aisha Khan");
        assert!(prompt.contains("'Aisha Khan'"));
        assert!(prompt.contains(r#"{"prediction": "Realistic"}"#));
        assert!(prompt.contains(r#""prediction": "Not Realistic""#));
    }
}
