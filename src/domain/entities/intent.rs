/// What a command is asking for. Exactly one intent is chosen per command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    OpenApp,
    Search,
    Weather,
    News,
    Time,
    Date,
    Greeting,
    Identity,
    Joke,
    Help,
    Thanks,
    Farewell,
    SystemStatus,
    /// Nothing matched: LLM, web search or an "I don't understand" reply
    Fallback,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::OpenApp => "open_app",
            Intent::Search => "search",
            Intent::Weather => "weather",
            Intent::News => "news",
            Intent::Time => "time",
            Intent::Date => "date",
            Intent::Greeting => "greeting",
            Intent::Identity => "identity",
            Intent::Joke => "joke",
            Intent::Help => "help",
            Intent::Thanks => "thanks",
            Intent::Farewell => "farewell",
            Intent::SystemStatus => "system_status",
            Intent::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
