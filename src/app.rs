use anyhow::Result;
use std::sync::Arc;

use crate::cli::{parse_cli_args, usage_text, version_text, CliCommand};
use crate::command_handlers::{handle_analyze, handle_validate};
use crate::config::AnalyzerSettings;

pub type OutputHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Settings plus the sink that receives report text
#[derive(Clone)]
pub struct AppContext {
    settings: AnalyzerSettings,
    output_hook: OutputHook,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AppContext {
    pub fn from_env() -> Self {
        Self {
            settings: AnalyzerSettings::from_env(),
            output_hook: Arc::new(|text| println!("{}", text)),
        }
    }

    pub fn with_settings(mut self, settings: AnalyzerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_output_hook(mut self, output_hook: OutputHook) -> Self {
        self.output_hook = output_hook;
        self
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    pub fn emit(&self, text: &str) {
        (self.output_hook)(text);
    }
}

/// Run the app by parsing CLI-style args and dispatching the command.
pub fn run<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let command = parse_cli_args(args)?;
    execute_command(command)
}

/// Execute a pre-parsed command with settings from the environment.
pub fn execute_command(command: CliCommand) -> Result<()> {
    execute_command_with_context(command, &AppContext::from_env())
}

/// Execute a pre-parsed command. This is reusable for non-CLI entrypoints.
pub fn execute_command_with_context(command: CliCommand, context: &AppContext) -> Result<()> {
    match command {
        CliCommand::Help => {
            context.emit(&usage_text());
            Ok(())
        }
        CliCommand::Version => {
            context.emit(&version_text());
            Ok(())
        }
        CliCommand::Analyze {
            topology,
            mac_dir,
            switch_prefix,
            format,
            output,
        } => {
            let mut settings = context.settings().clone();
            if let Some(path) = topology {
                settings = settings.with_topology(path);
            }
            if let Some(path) = mac_dir {
                settings = settings.with_mac_dir(path);
            }
            if let Some(prefix) = switch_prefix {
                settings = settings.with_switch_prefix(prefix);
            }
            if let Some(format) = format {
                settings = settings.with_format(format);
            }
            if let Some(path) = output {
                settings = settings.with_output(path);
            }
            handle_analyze(&settings, context)
        }
        CliCommand::Validate { topology } => {
            let path = topology.unwrap_or_else(|| context.settings().topology_file.clone());
            handle_validate(&path, context)
        }
    }
}
