//! Slash commands understood by the terminal front end. Anything that is not
//! a command is sent as chat input.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Say(String),
    Demo,
    Guided,
    Autoplay,
    Stop,
    Next,
    Reset,
    ExitGuided,
    NewConversation,
    Actions,
    Action(String),
    Chip(usize),
    Page(String),
    Objective(bool),
    Team(String),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl ReplCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Say(_) => "say",
            Self::Demo => "demo",
            Self::Guided => "guided",
            Self::Autoplay => "autoplay",
            Self::Stop => "stop",
            Self::Next => "next",
            Self::Reset => "reset",
            Self::ExitGuided => "exit",
            Self::NewConversation => "new",
            Self::Actions => "actions",
            Self::Action(_) => "action",
            Self::Chip(_) => "chip",
            Self::Page(_) => "page",
            Self::Objective(_) => "objective",
            Self::Team(_) => "team",
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Empty => "empty",
            Self::Invalid(_) => "invalid",
        }
    }
}

pub const HELP: &str = "\
commands:
  /demo              start scripted demo playback
  /guided            start the guided walkthrough
  /autoplay, /stop   toggle guided autoplay
  /next, /reset      step or rewind the walkthrough
  /exit              leave the walkthrough
  /new               start a new conversation
  /actions           list quick actions for this page
  /action <token>    run a quick action
  /chip <n>          click suggestion n on the latest message
  /page <name>       reopen the assistant on another page
  /objective on|off  toggle objective creation context
  /team <summary>    push a team suggestion into the chat
  /quit              close the assistant
anything else is sent as a message";

pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Say(line.to_string());
    };

    let (verb, arg) = match rest.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (rest, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "demo" => ReplCommand::Demo,
        "guided" => ReplCommand::Guided,
        "autoplay" => ReplCommand::Autoplay,
        "stop" => ReplCommand::Stop,
        "next" => ReplCommand::Next,
        "reset" => ReplCommand::Reset,
        "exit" => ReplCommand::ExitGuided,
        "new" => ReplCommand::NewConversation,
        "actions" => ReplCommand::Actions,
        "action" if !arg.is_empty() => ReplCommand::Action(arg.to_string()),
        "chip" => match arg.parse::<usize>() {
            Ok(index) if index > 0 => ReplCommand::Chip(index),
            _ => ReplCommand::Invalid(format!("expected a chip number, got '{arg}'")),
        },
        "page" if !arg.is_empty() => ReplCommand::Page(arg.to_string()),
        "objective" => match arg.to_ascii_lowercase().as_str() {
            "on" => ReplCommand::Objective(true),
            "off" => ReplCommand::Objective(false),
            _ => ReplCommand::Invalid("usage: /objective on|off".into()),
        },
        "team" => ReplCommand::Team(arg.to_string()),
        "help" | "?" => ReplCommand::Help,
        "quit" | "q" => ReplCommand::Quit,
        other => ReplCommand::Invalid(format!("unknown command '/{other}'")),
    }
}
