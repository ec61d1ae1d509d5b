use search_core::Msg;

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Quit,
    Help,
}

pub const HELP: &str = "commands: type <text> | pick <n> | enter | submit | quit";

/// Parses one input line. Unknown commands yield `None`.
///
/// `type` keeps everything after the first space verbatim, so trailing
/// spaces and an empty text are both expressible.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (head, rest) = match line.split_once(' ') {
        Some((head, rest)) => (head, Some(rest)),
        None => (line, None),
    };

    match head {
        "type" => Some(Command::Dispatch(Msg::TextChanged(
            rest.unwrap_or_default().to_string(),
        ))),
        "pick" => {
            let n: usize = rest?.trim().parse().ok()?;
            let index = n.checked_sub(1)?;
            Some(Command::Dispatch(Msg::PredictionSelected { index }))
        }
        "enter" => Some(Command::Dispatch(Msg::EnterPressed)),
        "submit" => Some(Command::Dispatch(Msg::SubmitClicked)),
        "quit" | "exit" => Some(Command::Quit),
        "help" | "?" => Some(Command::Help),
        _ => None,
    }
}
