use console::style;
use polydraw_core::error::PolydrawError;
use std::fmt;
use std::io;

/// Enhanced error type with suggestions
#[derive(Clone)]
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for a backend that could not be reached
pub fn backend_unreachable(base_url: &str, reason: &str) -> CliError {
    CliError::new("Cannot reach the polygon backend")
        .with_context(format!("The submission did not get a response.\n\nBackend: {}\nError: {}", base_url, reason))
        .with_suggestion("Check that the backend is running and serves POST /draw_polygon")
        .with_suggestion("Point at another backend: polydraw --base-url http://host:port submit ...")
        .with_suggestion("Or try the session without a backend: polydraw --dry-run ...")
        .with_help("Run: polydraw config")
}

/// Create error for a backend that answered with a failure
pub fn backend_rejected(reason: &str) -> CliError {
    CliError::new("The backend rejected the polygon")
        .with_context(format!("Error: {}", reason))
        .with_suggestion("Check the polygon coordinates are [lng, lat] in WGS 84")
        .with_suggestion("Check the backend logs for details")
        .with_help("Run: polydraw submit --help")
}

/// Create error for unusable polygon input
pub fn invalid_polygon(reason: &str) -> CliError {
    CliError::new("Invalid polygon")
        .with_context(format!("The polygon could not be drawn.\n\nReason: {}", reason))
        .with_suggestion("Give at least 3 distinct vertices: --ring \"0,0 0,1 1,1\"")
        .with_suggestion("Vertices are lng,lat pairs separated by spaces")
        .with_help("Run: polydraw submit --help")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    let error = CliError::new("Invalid configuration")
        .with_context(format!("Configuration value '{}' is invalid.\n\nReason: {}", key, reason));

    let error = if key == "file" {
        error.with_suggestion("Check polydraw.toml for syntax errors")
    } else {
        error
            .with_suggestion(format!("Check '{}' in polydraw.toml", key))
            .with_suggestion("Check POLYDRAW_* environment variables and command-line flags")
    };

    error.with_help("Run: polydraw config")
}

/// Convert anyhow::Error to CliError by looking for a known cause
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let message = format!("{:#}", error);

    for cause in error.chain() {
        if let Some(cli_error) = cause.downcast_ref::<CliError>() {
            return cli_error.clone();
        }

        if let Some(polydraw_error) = cause.downcast_ref::<PolydrawError>() {
            return match polydraw_error {
                PolydrawError::InvalidPolygon { .. } => invalid_polygon(&message),
                PolydrawError::ConfigInvalid { key, .. } => invalid_config(key, &message),
                PolydrawError::ShapeNotAllowed { .. } => CliError::new(message)
                    .with_suggestion("Only polygons can be drawn with the default toolbar"),
                _ => CliError::new(message),
            };
        }

        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            match io_error.kind() {
                io::ErrorKind::NotFound => {
                    return CliError::new("File not found")
                        .with_context(format!("Error: {}", message))
                        .with_suggestion("Check the file path and try again");
                }
                io::ErrorKind::PermissionDenied => {
                    return CliError::new("Permission denied")
                        .with_context(format!("Error: {}", message))
                        .with_suggestion("Check file permissions");
                }
                _ => {}
            }
        }
    }

    CliError::new(message)
}
