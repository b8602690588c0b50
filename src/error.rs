//! Error types for field editing, uploads, configuration and templates

/// Problems raised by a widget while validating user input.
///
/// None of these are fatal. Widgets turn them into an inline banner and keep
/// their previous value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("`{file_name}` is not an accepted file type. Allowed types: {}", .allowed.join(", "))]
    InvalidFileType {
        file_name: String,
        allowed: Vec<String>,
    },
    #[error("`{input}` is not a valid number")]
    InvalidNumber { input: String },
    #[error("duplicate key `{key}`")]
    DuplicateKey { key: String },
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("invalid prompt variable `{{{name}}}`")]
    InvalidPromptVariable { name: String },
    #[error("unbalanced `{{` in prompt template")]
    UnclosedPromptVariable,
    #[error("upload failed: {0}")]
    Upload(String),
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("file not found: {path}")]
    NotFound { path: String },
    #[error("failed to create upload directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },
    #[error("upload worker stopped before finishing")]
    Disconnected,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to resolve config directory")]
    ConfigDirectoryUnavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid template JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("node template has no `template` object")]
    MissingTemplate,
    #[error("field `{name}` is invalid: {source}")]
    Field {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GlobalVariableError {
    #[error("global variable `{0}` does not exist")]
    NotFound(String),
}
