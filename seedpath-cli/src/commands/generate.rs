use seedpath_core::{generate_mnemonic, Result, WordCount};

pub fn handle_generate_command(words: usize) -> Result<()> {
    let word_count = WordCount::try_from(words)?;
    let mnemonic = zeroize::Zeroizing::new(generate_mnemonic(word_count)?);

    println!("IMPORTANT: Write these {} words down on paper, in order.", word_count.words());
    println!("Anyone holding them controls the funds. Never store them online.");
    println!();
    for (i, word) in mnemonic.split_whitespace().enumerate() {
        println!("{:>2}. {}", i + 1, word);
    }

    Ok(())
}
