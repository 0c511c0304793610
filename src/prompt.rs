// Interactive decision points
//
// Every question the launcher asks goes through a `Decider`, so sessions can
// run against canned answers (`--yes`, tests) as well as a terminal.

use crate::ui;
use console::Term;
use dialoguer::{Confirm, theme::ColorfulTheme};
use log::debug;
use std::io::{self, BufRead, IsTerminal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    /// The client is not installed; download and install it?
    InstallClient,
    /// Required files are missing; re-download the client?
    Reinstall { missing: usize },
    /// Everything is ready; start the game?
    LaunchNow,
}

impl Question {
    pub fn text(&self) -> String {
        match self {
            Question::InstallClient => "Download and install the WoW client?".to_string(),
            Question::Reinstall { missing } => {
                format!("{} critical file(s) missing. Re-download client?", missing)
            }
            Question::LaunchNow => "Launch WoW now?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Abort,
}

pub trait Decider {
    fn decide(&mut self, question: &Question) -> anyhow::Result<Decision>;
}

/// Asks on the terminal. Defaults to "no", like the y/n prompts it replaces.
///
/// Without a terminal the answer is read as one line from stdin, so piped
/// answers still work.
#[derive(Default)]
pub struct TerminalDecider {
    theme: ColorfulTheme,
}

impl Decider for TerminalDecider {
    fn decide(&mut self, question: &Question) -> anyhow::Result<Decision> {
        if !Term::stderr().is_term() || !io::stdin().is_terminal() {
            ui::prompt(&question.text());
            let decision = read_answer(&mut io::stdin().lock())?;
            debug!("Read {:?} for {:?} from stdin", decision, question);
            return Ok(decision);
        }

        let yes = Confirm::with_theme(&self.theme)
            .with_prompt(question.text())
            .default(false)
            .interact()?;
        Ok(if yes { Decision::Proceed } else { Decision::Abort })
    }
}

/// One line of input: `y` or `Y` proceeds, anything else (including end of
/// input) aborts.
pub fn read_answer(input: &mut impl BufRead) -> io::Result<Decision> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(if line.trim().eq_ignore_ascii_case("y") {
        Decision::Proceed
    } else {
        Decision::Abort
    })
}

/// Gives the same answer to every question.
pub struct FixedDecider(pub Decision);

impl Decider for FixedDecider {
    fn decide(&mut self, question: &Question) -> anyhow::Result<Decision> {
        debug!("Answering {:?} with {:?}", question, self.0);
        Ok(self.0)
    }
}

#[cfg(test)]
pub mod scripted {
    use super::*;
    use std::collections::VecDeque;

    /// Replays answers in order and records the questions it was asked.
    /// Running out of answers fails the test.
    pub struct ScriptedDecider {
        answers: VecDeque<Decision>,
        pub asked: Vec<Question>,
    }

    impl ScriptedDecider {
        pub fn new(answers: &[Decision]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Decider for ScriptedDecider {
        fn decide(&mut self, question: &Question) -> anyhow::Result<Decision> {
            self.asked.push(question.clone());
            self.answers
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("Unexpected question: {:?}", question))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_decider() {
        let mut decider = FixedDecider(Decision::Proceed);
        assert_eq!(decider.decide(&Question::LaunchNow).unwrap(), Decision::Proceed);
        assert_eq!(
            decider.decide(&Question::Reinstall { missing: 2 }).unwrap(),
            Decision::Proceed
        );
    }

    #[test]
    fn test_read_answer() {
        let answer = |text: &str| read_answer(&mut text.as_bytes()).unwrap();
        assert_eq!(answer("y\n"), Decision::Proceed);
        assert_eq!(answer("Y\r\n"), Decision::Proceed);
        assert_eq!(answer("n\n"), Decision::Abort);
        assert_eq!(answer("yes please\n"), Decision::Abort);
        assert_eq!(answer(""), Decision::Abort);
    }

    #[test]
    fn test_answers_are_read_line_by_line() {
        let mut input = "y\nn\n".as_bytes();
        assert_eq!(read_answer(&mut input).unwrap(), Decision::Proceed);
        assert_eq!(read_answer(&mut input).unwrap(), Decision::Abort);
    }

    #[test]
    fn test_question_text() {
        assert!(Question::Reinstall { missing: 3 }.text().starts_with("3 critical"));
    }
}
