/// Script template and assembly errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScriptError {
    #[error("no binding for placeholder {{{{{name}}}}}")]
    MissingParameter { name: String },

    #[error(
        "program text is {current_bytes} bytes, max {max_bytes} (helpers {helper_bytes} + body {body_bytes})"
    )]
    TooLarge {
        current_bytes: usize,
        max_bytes: usize,
        helper_bytes: usize,
        body_bytes: usize,
    },
}
