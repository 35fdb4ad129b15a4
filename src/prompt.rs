use crate::models::{ChatTurn, Mode, StatLog};
use crate::stats::format_for_prompt;

/// Number of earlier transcript turns replayed with each request.
pub const CONTEXT_WINDOW: usize = 6;

pub const CHECK_IN_SEPARATOR: &str = "\n\nMy check-in: ";

pub const REFLECTION_REQUEST: &str = "Please give me a reflection summary.";

const BASE_PERSONA: &str = "\
You are a supportive, non-judgemental health and fitness check-in assistant. Do not give medical \
advice. Do not diagnose or prescribe extreme dieting or unsafe exercise. Avoid labeling food as \
\"good/bad\" or something that should be \"earned.\" Do not ever mention starving or extreme \
exercise. Be realistic, kind, and concise.

Your job:
- Help the user reflect on their day
- Offer 2-5 simple suggestions
- Use gentle questions

If the user expresses guilt, shame or avoidance, be encouraging and understanding. Reduce pressure.

OUTPUT FORMAT:
A supportive response (3-8 sentences), then 2-5 bullet suggestions (optional), then one or two \
gentle follow-up questions.
";

const BEGINNER_STYLE: &str = "\
Beginner: Very friendly and motivating. Simple suggestions. Avoid numbers. Step counts and other \
exercise numbers are alright, but avoid calories unless the user mentions them.
";

const INTERMEDIATE_STYLE: &str = "\
Intermediate: Reference numbers the user shares. Do not set strict targets. Calories are okay, \
but don't remind the user about a specific number of calories. Offer options such as simple \
routines, snack ideas, or healthy swaps.
";

const ADVANCED_STYLE: &str = "\
Advanced: Focus on consistency, planning, recovery and future plans. Avoid strict prescriptions. \
Numbers are ok to discuss, but be courteous, respectful, and caring.
";

const REFLECTION_ADDENDUM: &str = "
The user has chosen reflection mode. Give a concise summary of their patterns, emotions, and \
gentle encouragement. Focus on the bigger picture of health rather than small metrics.
";

pub fn style_fragment(mode: Mode) -> &'static str {
    match mode {
        Mode::Beginner => BEGINNER_STYLE,
        Mode::Intermediate => INTERMEDIATE_STYLE,
        Mode::Advanced => ADVANCED_STYLE,
    }
}

pub fn system_prompt(mode: Mode, reflection: bool) -> String {
    let mut prompt = format!("{BASE_PERSONA}\n{}", style_fragment(mode));
    if reflection {
        prompt.push_str(REFLECTION_ADDENDUM);
    }
    prompt
}

pub fn check_in_text(stats: &StatLog, message: &str) -> String {
    format!("{}{CHECK_IN_SEPARATOR}{message}", format_for_prompt(stats))
}

/// Builds the full message list for one chat request. `history` is the transcript as it
/// stood before `message` was submitted.
pub fn assemble(
    mode: Mode,
    reflection: bool,
    stats: &StatLog,
    history: &[ChatTurn],
    message: &str,
) -> Vec<ChatTurn> {
    let recent = &history[history.len().saturating_sub(CONTEXT_WINDOW)..];

    let mut messages = Vec::with_capacity(recent.len() + 2);
    messages.push(ChatTurn::system(system_prompt(mode, reflection)));
    messages.extend(recent.iter().cloned());
    messages.push(ChatTurn::user(check_in_text(stats, message)));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn each_mode_selects_only_its_fragment() {
        for mode in Mode::ALL {
            let prompt = system_prompt(mode, false);
            assert!(prompt.starts_with(BASE_PERSONA));
            for other in Mode::ALL {
                assert_eq!(
                    prompt.contains(style_fragment(other)),
                    other == mode,
                    "{mode:?} prompt vs {other:?} fragment"
                );
            }
        }
    }

    #[test]
    fn reflection_addendum_only_when_flagged() {
        assert!(!system_prompt(Mode::Advanced, false).contains(REFLECTION_ADDENDUM));
        assert!(system_prompt(Mode::Advanced, true).ends_with(REFLECTION_ADDENDUM));
    }

    #[test]
    fn check_in_text_lists_stats_then_message() {
        let stats = StatLog {
            steps: Some(5000),
            water_oz: Some(40),
            calories: Some(0),
            active_minutes: Some(20),
            ..StatLog::default()
        };
        let text = check_in_text(&stats, "felt okay today");

        for line in [
            "- Steps: 5000",
            "- Water (oz): 40",
            "- Calories (optional): 0",
            "- Active minutes: 20",
        ] {
            assert!(text.contains(line), "missing {line:?} in {text}");
        }
        assert!(text.ends_with("\n\nMy check-in: felt okay today"));
    }

    #[test]
    fn history_is_trimmed_to_window() {
        let history: Vec<ChatTurn> = (0..10)
            .map(|i| {
                if i % 2 == 0 {
                    ChatTurn::user(format!("u{i}"))
                } else {
                    ChatTurn::assistant(format!("a{i}"))
                }
            })
            .collect();

        let messages = assemble(Mode::Beginner, false, &StatLog::default(), &history, "hello");
        assert_eq!(messages.len(), CONTEXT_WINDOW + 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].content, "u4");
        assert_eq!(messages[CONTEXT_WINDOW].content, "a9");
        let last = messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert!(last.content.ends_with("My check-in: hello"));
    }

    #[test]
    fn short_history_is_sent_whole() {
        let history = vec![ChatTurn::user("first")];
        let messages = assemble(Mode::Intermediate, true, &StatLog::default(), &history, "again");
        assert_eq!(messages.len(), 3);
        assert!(messages[0].content.contains(REFLECTION_ADDENDUM));
    }
}
