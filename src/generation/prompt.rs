//! Fixed prompt template for grounded answers

/// Fill the CONTEXT/QUERY template with the assembled context and the user's
/// query. The instruction asks for step-by-step reasoning and fixes the
/// fallback phrase for unanswerable queries.
pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "Context information is below. \n\
         -------------------------------- \n\
         CONTEXT: {context} \n\
         -------------------------------- \n\
         Given the context information above think step by step \
         to answer the user's query in a crisp and concise manner. \
         In case you don't know the answer say 'I don't know'. \n \
         QUERY: {query} \n\
         ANSWER: "
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_frames_context_and_query() {
        let prompt = build_prompt("the sky is blue", "what color is the sky?");

        let context_pos = prompt.find("CONTEXT: the sky is blue").unwrap();
        let query_pos = prompt.find("QUERY: what color is the sky?").unwrap();
        assert!(context_pos < query_pos);
        assert!(prompt.ends_with("ANSWER: "));
    }

    #[test]
    fn template_fixes_the_fallback_phrase() {
        let prompt = build_prompt("", "");
        assert!(prompt.contains("'I don't know'"));
        assert!(prompt.contains("think step by step"));
    }

    #[test]
    fn substituted_values_pass_through_unmodified() {
        let context = "line one\nline two";
        let prompt = build_prompt(context, "q");
        assert!(prompt.contains(context));
    }
}
