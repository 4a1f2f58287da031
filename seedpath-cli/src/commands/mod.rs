pub mod derive;
pub mod find;
pub mod generate;
pub mod inspect;

pub use derive::handle_derive_command;
pub use find::handle_find_command;
pub use generate::handle_generate_command;
pub use inspect::handle_inspect_command;

use dialoguer::Password;
use seedpath_core::Result;
use zeroize::Zeroizing;

/// Takes the phrase from the command line or prompts for it without echo.
pub(crate) fn read_mnemonic(mnemonic: Option<String>) -> Result<Zeroizing<String>> {
    let phrase = match mnemonic {
        Some(m) => m,
        None => Password::new()
            .with_prompt("Enter mnemonic phrase")
            .interact()?,
    };
    Ok(Zeroizing::new(phrase))
}
