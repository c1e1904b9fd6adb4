//! Canned replies and reply formatting

use chrono::{DateTime, TimeZone};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::infrastructure::config::Mode;

pub const GREETINGS: [&str; 4] = [
    "Hello, sir. How may I assist you today?",
    "Greetings. I am at your service.",
    "Hello. All systems are operational and ready for your commands.",
    "Good day, sir. How can I be of assistance?",
];

pub const JOKES: [&str; 8] = [
    "Why did the AI go to art school? To improve its neural network!",
    "I would tell you a joke about artificial intelligence, but I'm afraid you wouldn't get it.",
    "Why don't scientists trust atoms? Because they make up everything!",
    "What do you call an AI that sings? Artificial Harmonies!",
    "Why was the computer cold? It left its Windows open.",
    "What's a computer's favorite snack? Microchips.",
    "Why did the computer go to the doctor? Because it had a virus!",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
];

pub const THANKS: [&str; 4] = [
    "You're welcome, sir. Always a pleasure to be of service.",
    "Happy to assist, sir. That's what I'm here for.",
    "No need for thanks, sir. Serving you is my primary function.",
    "Of course, sir. Is there anything else you require?",
];

pub const FAREWELLS: [&str; 4] = [
    "Goodbye, sir. I'll be here when you need me.",
    "Entering standby mode. Call me when you need assistance.",
    "I'll be here monitoring systems while you're away, sir.",
    "Until next time, sir.",
];

pub const UNKNOWN_ONLINE: [&str; 4] = [
    "I'm not sure I understand. Would you like me to search the web for information about this?",
    "I don't have that information in my database. Would you like me to look it up online?",
    "I'm still learning, sir. Would you like me to search for that on the internet?",
    "I don't have a specific response for that. Would you like me to search the web for you?",
];

pub const UNKNOWN_OFFLINE: [&str; 4] = [
    "I'm not sure I understand. Could you please rephrase your request?",
    "I don't have that information in my database. I can help with other queries though.",
    "I'm still learning, sir. Could you try a different command?",
    "I don't have a specific response for that. Try asking me something else.",
];

pub const IDENTITY: &str = "I am KAEL, Knowledge and Artificially Enhanced Logic. I was designed to assist you with a variety of tasks, much like my inspiration, J.A.R.V.I.S. I can search the web, check the weather, get news updates, and perform various system functions.";

pub const HELP: &str = "I can assist with various tasks, sir. I can:\n\n\
1. Search the web for information\n\
2. Check the weather in any location\n\
3. Get the latest news headlines\n\
4. Tell you the time and date\n\
5. Open applications\n\
6. Tell jokes\n\
7. Control system functions\n\n\
Just ask me what you need, and I'll do my best to assist you.";

pub const SYSTEM_STATUS: &str = "All systems are functioning within normal parameters, sir. CPU usage is optimal, memory allocation is stable, and all subsystems are online. Internet connectivity is active, and I am able to access web services.";

pub const NEED_LOCATION: &str =
    "I need a location to check the weather. For example, try asking 'What's the weather in New York?'";

/// Temperature used when the dispatcher forwards a command to the LLM
pub const FALLBACK_TEMPERATURE: f32 = 0.7;

pub fn unknown_table(mode: Mode) -> &'static [&'static str] {
    match mode {
        Mode::Online => &UNKNOWN_ONLINE,
        Mode::Offline => &UNKNOWN_OFFLINE,
    }
}

/// Uniform pick from a non-empty table
pub fn pick<R: Rng>(table: &[&'static str], rng: &mut R) -> &'static str {
    table.choose(rng).copied().unwrap_or_default()
}

/// `HH:MM AM/PM`
pub fn clock_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%I:%M %p").to_string()
}

/// `Weekday, Month DD, YYYY`
pub fn long_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%A, %B %d, %Y").to_string()
}

pub fn time_reply<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("The current time is {}, sir.", clock_time(now))
}

pub fn date_reply<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("Today is {}, sir.", long_date(now))
}

/// Persona preamble wrapped around a command before it goes to the LLM
pub fn persona_prompt(command: &str) -> String {
    format!(
        "You are KAEL (Knowledge and Artificially Enhanced Logic), an AI assistant inspired by J.A.R.V.I.S.\n\n\
Please respond to the following user query in a helpful, concise, and slightly formal manner:\n\n\
\"{}\"\n\n\
Keep your response under 150 words and maintain a slightly technical, assistant-like tone.\n",
        command
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_time_and_date_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        assert_eq!(time_reply(&at), "The current time is 02:07 PM, sir.");
        assert_eq!(date_reply(&at), "Today is Tuesday, March 05, 2024, sir.");
    }

    #[test]
    fn test_pick_covers_table() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let g = pick(&GREETINGS, &mut rng);
            assert!(GREETINGS.contains(&g));
            seen.insert(g);
        }
        assert_eq!(seen.len(), GREETINGS.len());
    }

    #[test]
    fn test_pick_empty_table() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick(&[], &mut rng), "");
    }

    #[test]
    fn test_persona_prompt_quotes_command() {
        let prompt = persona_prompt("what is rust?");
        assert!(prompt.starts_with("You are KAEL"));
        assert!(prompt.contains("\"what is rust?\""));
        assert!(prompt.contains("under 150 words"));
    }

    #[test]
    fn test_unknown_table_by_mode() {
        assert!(unknown_table(Mode::Online)[0].contains("search the web"));
        assert!(unknown_table(Mode::Offline)[0].contains("rephrase"));
    }
}
