// Prompt templates shared by the providers.
//
// OpenAI receives a system/user message pair; Gemini receives one combined
// prompt since the request carries a single content part.

const KEY_RULES: &str = "Rules for key generation:\n\
     - Use semantic names that represent the content's meaning\n\
     - Use common patterns like STEP1_TITLE, STEP2_TITLE for sequential items\n\
     - Use NOT_SATISFIED, VERY_SATISFIED for ratings\n\
     - Use PLACEHOLDER for input placeholders\n\
     - Use THANKS for thank you messages\n\
     - Keep keys concise but meaningful\n";

const NO_MARKDOWN: &str =
    "IMPORTANT: Return a valid JSON object only, with no markdown formatting or backticks.";

fn single_language_task(prefix: &str) -> String {
    format!(
        "You are an HTML text extractor and translator. Your task is to:\n\
         1. Extract all human-readable text from the HTML, including relevant attributes like placeholder\n\
         2. Generate an appropriate translation key in SCREAMING_SNAKE_CASE\n\
         3. Translate the text to English\n\
         4. Return a JSON object where each key follows the pattern: \"{prefix}.KEY_NAME\" and the value is the English translation\n"
    )
}

fn multi_language_task(prefix: &str) -> String {
    format!(
        "You are an HTML text extractor and translator. Your task is to:\n\
         1. Extract all human-readable text from the HTML, including relevant attributes like placeholder\n\
         2. Generate an appropriate translation key in SCREAMING_SNAKE_CASE\n\
         3. Translate the text to Spanish, English, French, and Portuguese\n\
         4. Return a JSON object with the following structure:\n\
         {{\n  \
           \"spanish\": {{ \"{prefix}.KEY_NAME\": \"Spanish translation\" }},\n  \
           \"english\": {{ \"{prefix}.KEY_NAME\": \"English translation\" }},\n  \
           \"french\": {{ \"{prefix}.KEY_NAME\": \"French translation\" }},\n  \
           \"portuguese\": {{ \"{prefix}.KEY_NAME\": \"Portuguese translation\" }}\n\
         }}\n"
    )
}

fn single_language_constraints() -> &'static str {
    "IMPORTANT: Only return the translated text as values, do not include the original text \
     or create duplicate keys with \"_TRANSLATION\" suffix.\n"
}

fn multi_language_constraints(prefix: &str) -> String {
    format!(
        "IMPORTANT:\n\
         - Only return the translated text as values, do not include the original text\n\
         - Use the same keys across all languages\n\
         - Each key should follow the pattern: \"{prefix}.KEY_NAME\"\n\
         - Ignore any numbers-only content\n"
    )
}

pub fn single_language_system_prompt(prefix: &str) -> String {
    format!(
        "{}\n{}\n{}",
        single_language_task(prefix),
        KEY_RULES,
        single_language_constraints()
    )
}

pub fn single_language_user_prompt(html: &str) -> String {
    format!("Extract text, generate keys and translate this HTML to English: {}", html)
}

pub fn multi_language_system_prompt(prefix: &str) -> String {
    format!(
        "{}\n{}\n{}",
        multi_language_task(prefix),
        KEY_RULES,
        multi_language_constraints(prefix)
    )
}

pub fn multi_language_user_prompt(html: &str) -> String {
    format!(
        "Extract text, generate keys and translate this HTML to Spanish, English, French, and Portuguese: {}",
        html
    )
}

pub fn single_language_prompt(prefix: &str, html: &str) -> String {
    format!(
        "{}\nInput HTML: {}\n\n{}",
        single_language_system_prompt(prefix),
        html,
        NO_MARKDOWN
    )
}

pub fn multi_language_prompt(prefix: &str, html: &str) -> String {
    format!(
        "{}\nInput HTML: {}\n\n{}",
        multi_language_system_prompt(prefix),
        html,
        NO_MARKDOWN
    )
}
