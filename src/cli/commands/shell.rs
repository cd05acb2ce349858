//! Shell completions generation.
//!
//! Generates shell completion scripts for bash, zsh, fish, PowerShell and elvish.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::JornadaError;

/// Execute completions command
///
/// # Errors
///
/// Returns an error if the shell is unknown.
pub fn completions(shell: &str, install: bool) -> Result<String, JornadaError> {
    let shell_type = shell_from_str(shell).ok_or_else(|| {
        JornadaError::Config(format!(
            "Unknown shell: {shell}. Supported: bash, zsh, fish, powershell, elvish"
        ))
    })?;

    if install {
        Ok(completion_install_instructions(shell_type))
    } else {
        generate_completions(shell_type)
    }
}

/// Generate shell completions for the specified shell.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, JornadaError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate_to(&mut buf, shell, &mut cmd);
    String::from_utf8(buf).map_err(|e| JornadaError::Parse(format!("UTF-8 error: {e}")))
}

fn generate_to<W: Write>(buf: &mut W, shell: Shell, cmd: &mut clap::Command) {
    clap_complete::generate(shell, cmd, "jornada", buf);
}

/// Get shell from string name.
#[must_use]
pub fn shell_from_str(s: &str) -> Option<Shell> {
    match s.to_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "powershell" | "ps" | "pwsh" => Some(Shell::PowerShell),
        "elvish" => Some(Shell::Elvish),
        _ => None,
    }
}

/// Get installation instructions for shell completions.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc:
source <(jornada completions bash)

# Or save to a file:
jornada completions bash > ~/.local/share/bash-completion/completions/jornada
"
        .to_string(),

        Shell::Zsh => r"# Save to your fpath:
jornada completions zsh > ~/.zsh/completions/_jornada
# Then add to ~/.zshrc (before compinit):
fpath=(~/.zsh/completions $fpath)
autoload -Uz compinit && compinit
"
        .to_string(),

        Shell::Fish => r"# Save to fish completions directory:
jornada completions fish > ~/.config/fish/completions/jornada.fish
"
        .to_string(),

        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
jornada completions powershell | Out-String | Invoke-Expression
"
        .to_string(),

        Shell::Elvish => r"# Save to elvish completions directory:
jornada completions elvish > ~/.config/elvish/lib/jornada.elv

# Then add to rc.elv:
use jornada
"
        .to_string(),

        _ => "Unknown shell".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_from_str() {
        assert_eq!(shell_from_str("bash"), Some(Shell::Bash));
        assert_eq!(shell_from_str("ZSH"), Some(Shell::Zsh));
        assert_eq!(shell_from_str("pwsh"), Some(Shell::PowerShell));
        assert_eq!(shell_from_str("tcsh"), None);
    }

    #[test]
    fn test_generate_bash_completions() {
        let script = generate_completions(Shell::Bash).unwrap();
        assert!(script.contains("jornada"));
        assert!(script.contains("complete"));
    }

    #[test]
    fn test_completions_unknown_shell() {
        let err = completions("tcsh", false).unwrap_err();
        assert!(err.to_string().contains("Unknown shell"));
    }

    #[test]
    fn test_completions_install_instructions() {
        let text = completions("fish", true).unwrap();
        assert!(text.contains("jornada.fish"));
    }
}
