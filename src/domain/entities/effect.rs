/// A side effect requested while answering a command.
///
/// Effects are submitted and forgotten: the reply never waits for them and
/// their outcome is never reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Launch a local application by name
    LaunchApp(String),
    /// Open a URL in the default browser
    OpenBrowser(String),
    /// Read a reply aloud
    Speak(String),
}

impl Effect {
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::LaunchApp(_) => "launch_app",
            Effect::OpenBrowser(_) => "open_browser",
            Effect::Speak(_) => "speak",
        }
    }
}
