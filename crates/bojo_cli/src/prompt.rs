//! Yes/no confirmation on stdin.

use std::io::{self, BufRead, Write};

/// Asks `question`; `assume_yes` skips the prompt. EOF counts as "no".
pub fn confirm(question: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let mut stdout = io::stdout();
    write!(stdout, "{question} [y/N]: ")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::{confirm, is_yes};

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yeah"));
    }

    #[test]
    fn assume_yes_skips_prompt() {
        assert!(confirm("Delete?", true).expect("no io when assumed"));
    }
}
