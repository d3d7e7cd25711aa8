//! Check-config command implementation.

use std::path::Path;

use clipem::GameConfig;

use super::CliError;

/// Execute the check-config command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid.
pub(crate) fn execute(path: &Path, print: bool) -> Result<(), CliError> {
    let config = GameConfig::load(path)?;

    println!("{}: OK", path.display());
    for (i, player) in config.players.iter().enumerate() {
        println!("  P{} {} ({})", i + 1, player.name, player.color);
    }
    println!(
        "  entry roll {}, own tokens {}",
        config.rules.entry_roll,
        if config.rules.block_own_tokens {
            "block"
        } else {
            "stack"
        }
    );
    if config.max_turns > 0 {
        println!("  turn cap {}", config.max_turns);
    }

    if print {
        println!();
        print!("{}", config.to_toml_string()?);
    }

    Ok(())
}
