use std::io::{self, BufRead, Write};

use corpusrag_hybrid::RetrievalMode;

/// Print `message`, read one line. `None` on end of input.
pub fn prompt(message: &str) -> io::Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Menu choice; blank or unrecognised input selects graph mode.
pub fn prompt_mode() -> io::Result<RetrievalMode> {
    println!("Choose retrieval mode:");
    println!("  1) keyword");
    println!("  2) embedding");
    println!("  3) graph (default)");
    let answer = prompt("Mode [3]: ")?.unwrap_or_default();
    if answer.is_empty() {
        return Ok(RetrievalMode::Graph);
    }
    Ok(answer.parse().unwrap_or_else(|_| {
        println!("Unrecognised mode '{answer}', using graph.");
        RetrievalMode::Graph
    }))
}

pub fn prompt_yes_no(message: &str) -> io::Result<bool> {
    let answer = prompt(message)?.unwrap_or_default().to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes"))
}
