/// Values substituted into the system prompt template.
#[derive(Debug, Clone)]
pub struct PromptContext<'a> {
    pub dialect: &'a str,
    pub top_k: usize,
    pub tool_catalogue: &'a str,
    pub extra_instructions: &'a str,
    pub custom_instruction: Option<&'a str>,
}

/// Fills the `{{placeholder}}` slots of `template`.
///
/// Unknown placeholders are left as-is and runs of blank lines left behind by
/// empty values are collapsed.
pub fn render_system_prompt(template: &str, context: &PromptContext<'_>) -> String {
    let rendered = template
        .replace("{{dialect}}", context.dialect)
        .replace("{{top_k}}", &context.top_k.to_string())
        .replace("{{tool_catalogue}}", context.tool_catalogue)
        .replace("{{extra_instructions}}", context.extra_instructions)
        .replace(
            "{{custom_instruction}}",
            context.custom_instruction.unwrap_or(""),
        );

    let mut output = String::with_capacity(rendered.len());
    let mut blank_run = 0;
    for line in rendered.trim().lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        output.push_str(line);
        output.push('\n');
    }
    output.trim_end().to_string()
}
