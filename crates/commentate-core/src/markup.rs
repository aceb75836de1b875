//! Speech markup: pacing breaks, lead-in phrases and emphasis for a speech
//! synthesizer, driven by the commentary style.

use std::sync::LazyLock;

use rand::{Rng, seq::SliceRandom};
use regex::Regex;

use crate::{
    language::Language,
    style::{CommentaryStyle, StyleProfile},
};

pub const SHORT_PAUSE: &str = r#"<break time="0.2s"/>"#;
pub const MEDIUM_PAUSE: &str = r#"<break time="0.4s"/>"#;

const URDU_FULL_STOP_PAUSE: &str = r#"<break time="1s"/>"#;
const URDU_COMMA_PAUSE: &str = r#"<break time="0.5s"/>"#;
const URDU_EXCLAMATION_PAUSE: &str = r#"<break time="0.8s"/>"#;

/// Sentences longer than this get an optional midpoint pause
const MIDPOINT_PAUSE_MIN_WORDS: usize = 6;
/// Sentences longer than this may receive an inserted emphasis word
const EMPHASIS_MIN_WORDS: usize = 4;

/// Tags this formatter emits. Any other `<` or `>` is plain text.
static FORMATTER_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?(?:break|emphasis|prosody|lang)\b[^>]*>").unwrap());

static WRAPPER_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?(?:emphasis|prosody|lang)\b[^>]*>").unwrap());

static BREAK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<break\b(?:[^>]*?\btime\s*=\s*"([^"]*)")?[^>]*>"#).unwrap()
});

static UNSPEAKABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\w\s,.!?;:()\-'"۔،؟]+"#).unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?۔؟]+[.!?۔؟]*").unwrap());

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Pause(&'static str),
}

/// Format narration text for speech with the style's pacing patterns
pub fn format<R: Rng + ?Sized>(text: &str, style: CommentaryStyle, rng: &mut R) -> String {
    format_with_profile(text, style.profile(), rng)
}

/// Like [`format`] with an explicit profile.
///
/// Text that already carries break markers keeps its pauses and lead-ins; only
/// emphasis and the language wrapper are rebuilt, so formatting twice is a no-op.
pub fn format_with_profile<R: Rng + ?Sized>(
    text: &str,
    profile: &StyleProfile,
    rng: &mut R,
) -> String {
    let emphasis = emphasis_pattern(profile);
    let urdu_pacing = profile.native_language == Some(Language::Urdu);

    let tokens = if BREAK_TAG.is_match(text) {
        retain_pacing(text)
    } else {
        embellish(&clean(text), profile, emphasis.as_ref(), urdu_pacing, rng)
    };

    let body = render(tokens, emphasis.as_ref());
    if urdu_pacing && !body.is_empty() {
        format!(
            r#"<lang xml:lang="{}"><prosody rate="1.2" pitch="+2st">{}</prosody></lang>"#,
            Language::Urdu.locale(),
            body
        )
    } else {
        body
    }
}

fn embellish<R: Rng + ?Sized>(
    text: &str,
    profile: &StyleProfile,
    emphasis: Option<&Regex>,
    urdu_pacing: bool,
    rng: &mut R,
) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut index = 0;
    let mut after_bare_lead_in = false;

    for sentence in SENTENCE.find_iter(text) {
        let sentence = sentence.as_str().trim();
        if sentence.is_empty() {
            continue;
        }

        let opens_with_lead_in = starts_with_lead_in(sentence, profile);
        let skip_lead_in = opens_with_lead_in || after_bare_lead_in;
        after_bare_lead_in = opens_with_lead_in && is_bare_lead_in(sentence, profile);

        let mut words: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();

        if words.len() > EMPHASIS_MIN_WORDS
            && !words.iter().any(|w| is_emphasized(w, emphasis))
            && rng.gen_bool(probability(profile.emphasis_probability))
        {
            if let Some(word) = profile.emphasis.choose(rng) {
                let at = rng.gen_range(2..=words.len() - 2);
                words.insert(at, word.to_string());
            }
        }

        if !skip_lead_in {
            if rng.gen_bool(probability(profile.filler_probability)) {
                if let Some(filler) = profile.fillers.choose(rng) {
                    prepend(&mut words, filler);
                }
            }
            if index > 0 && rng.gen_bool(probability(profile.transition_probability)) {
                if let Some(transition) = profile.transitions.choose(rng) {
                    prepend(&mut words, transition);
                }
            }
        }

        let midpoint = (words.len() > MIDPOINT_PAUSE_MIN_WORDS
            && rng.gen_bool(probability(profile.pause_frequency)))
        .then(|| words.len() / 2);

        for (i, word) in words.into_iter().enumerate() {
            if midpoint == Some(i) {
                tokens.push(Token::Pause(SHORT_PAUSE));
            }
            let pause = pause_after(&word, urdu_pacing);
            tokens.push(Token::Word(word));
            if let Some(pause) = pause {
                tokens.push(Token::Pause(pause));
            }
        }

        index += 1;
    }

    tokens
}

/// Tokens of already-formatted text, with its break markers where they stand
fn retain_pacing(text: &str) -> Vec<Token> {
    let text = WRAPPER_TAG.replace_all(text, "");
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in BREAK_TAG.captures_iter(&text) {
        let Some(tag) = caps.get(0) else { continue };
        push_words(&mut tokens, &text[last..tag.start()]);
        tokens.push(Token::Pause(canonical_pause(
            caps.get(1).map_or("", |time| time.as_str()),
        )));
        last = tag.end();
    }
    push_words(&mut tokens, &text[last..]);

    tokens
}

fn push_words(tokens: &mut Vec<Token>, segment: &str) {
    let segment = UNSPEAKABLE.replace_all(segment, "");
    tokens.extend(
        segment
            .split_whitespace()
            .map(|word| Token::Word(word.to_string())),
    );
}

fn canonical_pause(time: &str) -> &'static str {
    match time.trim() {
        "0.2s" => SHORT_PAUSE,
        "0.5s" => URDU_COMMA_PAUSE,
        "0.8s" => URDU_EXCLAMATION_PAUSE,
        "1s" => URDU_FULL_STOP_PAUSE,
        _ => MEDIUM_PAUSE,
    }
}

/// Drop stray markup and anything a synthesizer should not read aloud
fn clean(text: &str) -> String {
    let text = FORMATTER_TAG.replace_all(text, "");
    let text = UNSPEAKABLE.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn probability(p: f64) -> f64 {
    if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 }
}

fn prepend(words: &mut Vec<String>, phrase: &str) {
    let phrase: Vec<String> = phrase.split_whitespace().map(str::to_string).collect();
    words.splice(0..0, phrase);
}

fn lead_ins(profile: &StyleProfile) -> impl Iterator<Item = &'static str> {
    profile
        .fillers
        .iter()
        .chain(profile.transitions.iter())
        .copied()
}

fn starts_with_lead_in(sentence: &str, profile: &StyleProfile) -> bool {
    lead_ins(profile).any(|phrase| sentence.starts_with(phrase))
}

/// A sentence that is nothing but a lead-in phrase, split off by its trailing dots
fn is_bare_lead_in(sentence: &str, profile: &StyleProfile) -> bool {
    lead_ins(profile).any(|phrase| sentence == phrase)
}

/// Whole-word, case-insensitive match of the style's emphasis vocabulary
fn emphasis_pattern(profile: &StyleProfile) -> Option<Regex> {
    if profile.emphasis.is_empty() {
        return None;
    }
    let alternatives: Vec<String> = profile.emphasis.iter().map(|w| regex::escape(w)).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))).ok()
}

fn is_emphasized(word: &str, emphasis: Option<&Regex>) -> bool {
    emphasis.is_some_and(|pattern| pattern.is_match(word))
}

fn pause_after(word: &str, urdu_pacing: bool) -> Option<&'static str> {
    let last = word.chars().last()?;
    if urdu_pacing {
        match last {
            '۔' => return Some(URDU_FULL_STOP_PAUSE),
            '،' => return Some(URDU_COMMA_PAUSE),
            '!' | '؟' => return Some(URDU_EXCLAMATION_PAUSE),
            _ => {}
        }
    }
    match last {
        ',' | ';' => Some(SHORT_PAUSE),
        '.' | '!' | '?' | '۔' | '؟' => Some(MEDIUM_PAUSE),
        _ => None,
    }
}

fn render(tokens: Vec<Token>, emphasis: Option<&Regex>) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(tokens.len());
    let mut previous_pause = false;

    for token in tokens {
        match token {
            Token::Word(word) => {
                previous_pause = false;
                match emphasis {
                    Some(pattern) => parts.push(
                        pattern
                            .replace_all(&word, r#"<emphasis level="strong">$0</emphasis>"#)
                            .into_owned(),
                    ),
                    None => parts.push(word),
                }
            }
            // leading pauses are dropped
            Token::Pause(_) if parts.is_empty() => {}
            Token::Pause(pause) => {
                if previous_pause {
                    if let Some(last) = parts.last_mut() {
                        *last = MEDIUM_PAUSE.to_string();
                    }
                } else {
                    parts.push(pause.to_string());
                }
                previous_pause = true;
            }
        }
    }

    if previous_pause {
        parts.pop();
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn quiet_profile() -> StyleProfile {
        StyleProfile {
            persona: "",
            guidance: "",
            fillers: &["Picture this..."],
            transitions: &["Then..."],
            emphasis: &["stunning"],
            pause_frequency: 0.0,
            filler_probability: 0.0,
            transition_probability: 0.0,
            emphasis_probability: 0.0,
            temperature: 0.7,
            native_language: None,
        }
    }

    fn eager_profile() -> StyleProfile {
        StyleProfile {
            emphasis: &["truly"],
            pause_frequency: 1.0,
            filler_probability: 1.0,
            transition_probability: 1.0,
            emphasis_probability: 1.0,
            ..quiet_profile()
        }
    }

    fn has_adjacent_pauses(text: &str) -> bool {
        let adjacent = Regex::new(r"<break[^>]*>\s*<break").unwrap();
        adjacent.is_match(text)
    }

    #[test]
    fn test_punctuation_pauses_and_emphasis() {
        let mut rng = StdRng::seed_from_u64(1);
        let text = "Look at that\u{1F600} sunset, it is <emphasis level=\"strong\">stunning</emphasis>. Wow!";

        let formatted = format_with_profile(text, &quiet_profile(), &mut rng);
        assert_eq!(
            formatted,
            r#"Look at that sunset, <break time="0.2s"/> it is <emphasis level="strong">stunning</emphasis>. <break time="0.4s"/> Wow!"#
        );
    }

    #[test]
    fn test_reformatting_without_randomness_is_stable() {
        let mut rng = StdRng::seed_from_u64(2);
        let profile = quiet_profile();
        let text = "Boats drift in; gulls follow. Is it stunning? Stunning, yes.";

        let once = format_with_profile(text, &profile, &mut rng);
        let twice = format_with_profile(&once, &profile, &mut rng);
        assert_eq!(once, twice);
        assert_eq!(once.matches("<emphasis").count(), 2);
    }

    #[test]
    fn test_eager_profile_inserts_every_pattern() {
        let mut rng = StdRng::seed_from_u64(3);
        let text = "The boats return at dawn today. Gulls circle the quiet harbor above.";

        let formatted = format_with_profile(text, &eager_profile(), &mut rng);

        assert!(formatted.starts_with(r#"Picture this... <break time="0.4s"/> The"#));
        assert_eq!(formatted.matches("Picture this...").count(), 2);
        assert_eq!(formatted.matches("Then...").count(), 1);
        assert!(formatted.contains(r#"Then... <break time="0.4s"/> Picture this..."#));
        assert_eq!(
            formatted
                .matches(r#"<emphasis level="strong">truly</emphasis>"#)
                .count(),
            2
        );
        assert!(formatted.contains(SHORT_PAUSE));
        assert!(formatted.ends_with("above."));
        assert!(!has_adjacent_pauses(&formatted));
    }

    #[test]
    fn test_reformatting_does_not_stack_lead_ins_or_tags() {
        let mut rng = StdRng::seed_from_u64(4);
        let profile = eager_profile();
        let text = "The boats return at dawn today. Gulls circle the quiet harbor above.";

        let once = format_with_profile(text, &profile, &mut rng);
        let twice = format_with_profile(&once, &profile, &mut rng);

        assert_eq!(twice.matches("Picture this...").count(), 2);
        assert_eq!(twice.matches("Then...").count(), 1);
        assert_eq!(twice.matches("<emphasis").count(), 2);
        assert!(!twice.contains("</emphasis></emphasis>"));
        assert!(!has_adjacent_pauses(&twice));
    }

    #[test]
    fn test_same_seed_same_output() {
        let text = "Notice how the tide turns. Every boat swings on its line, slowly and precisely, as the current shifts.";
        let first = format(text, CommentaryStyle::Analytical, &mut StdRng::seed_from_u64(42));
        let second = format(text, CommentaryStyle::Analytical, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_adjacent_pauses_for_any_seed() {
        let text = "Wait, look; there, again. It is, honestly, remarkable and incredibly calm today, isn't it? Yes!";
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let once = format(text, CommentaryStyle::Documentary, &mut rng);
            let twice = format(&once, CommentaryStyle::Documentary, &mut rng);
            assert!(!has_adjacent_pauses(&once), "seed {seed}: {once}");
            assert!(!has_adjacent_pauses(&twice), "seed {seed}: {twice}");
            assert!(!twice.ends_with("/>"));
        }
    }

    #[test]
    fn test_urdu_pacing_and_wrapping() {
        let profile = StyleProfile {
            native_language: Some(Language::Urdu),
            fillers: &["دیکھیں..."],
            transitions: &[],
            emphasis: &[],
            ..quiet_profile()
        };
        let text = "ارے واہ! یہ دیکھیے، کیا خوبصورت منظر ہے۔";

        let formatted = format_with_profile(text, &profile, &mut StdRng::seed_from_u64(5));
        assert_eq!(
            formatted,
            r#"<lang xml:lang="ur-PK"><prosody rate="1.2" pitch="+2st">ارے واہ! <break time="0.8s"/> یہ دیکھیے، <break time="0.5s"/> کیا خوبصورت منظر ہے۔</prosody></lang>"#
        );
    }

    #[test]
    fn test_urdu_wrapper_is_not_nested() {
        let text = "ارے واہ! یہ دیکھیے، کیا خوبصورت منظر ہے۔ واقعی بہت اچھا۔";
        let mut rng = StdRng::seed_from_u64(6);

        let once = format(text, CommentaryStyle::Urdu, &mut rng);
        let twice = format(&once, CommentaryStyle::Urdu, &mut rng);

        assert!(twice.starts_with(r#"<lang xml:lang="ur-PK"><prosody rate="1.2" pitch="+2st">"#));
        assert!(twice.ends_with("</prosody></lang>"));
        assert_eq!(twice.matches("<lang").count(), 1);
        assert_eq!(twice.matches("<prosody").count(), 1);
    }

    #[test]
    fn test_stray_angle_brackets_keep_surrounding_words() {
        let text = "Prices fell below 5 < 7 today, then rose > 9 again.";

        let formatted = format_with_profile(text, &quiet_profile(), &mut StdRng::seed_from_u64(1));
        assert_eq!(
            formatted,
            r#"Prices fell below 5 7 today, <break time="0.2s"/> then rose 9 again."#
        );

        let styled = format(text, CommentaryStyle::Analytical, &mut StdRng::seed_from_u64(1));
        for word in ["today,", "then", "rose", "again."] {
            assert!(styled.contains(word), "{word} missing from {styled}");
        }
    }

    #[test]
    fn test_reformatting_is_a_no_op_for_any_seed() {
        let text = "The tide turns slowly over the old stone harbor wall. \
                    Every boat swings on its line as the current shifts. \
                    Gulls wheel above, calling loudly!";

        for style in CommentaryStyle::ALL {
            for seed in 0..200 {
                let mut rng = StdRng::seed_from_u64(seed);
                let once = format(text, style, &mut rng);
                let twice = format(&once, style, &mut rng);
                assert_eq!(
                    once.matches("<break").count(),
                    twice.matches("<break").count(),
                    "{style} seed {seed}"
                );
                assert_eq!(once, twice, "{style} seed {seed}");
            }
        }
    }

    #[test]
    fn test_existing_breaks_are_kept_in_place() {
        let text = r#"Wait <break time="0.2s"/> for it. <break time="1s"/> There!"#;
        let formatted = format_with_profile(text, &eager_profile(), &mut StdRng::seed_from_u64(8));
        assert_eq!(
            formatted,
            r#"Wait <break time="0.2s"/> for it. <break time="1s"/> There!"#
        );
    }

    #[test]
    fn test_emphasis_matches_whole_words_only() {
        let text = "A stunning-looking bay, stunningly calm. Truly STUNNING!";
        let formatted = format_with_profile(text, &quiet_profile(), &mut StdRng::seed_from_u64(9));
        assert_eq!(
            formatted,
            r#"A <emphasis level="strong">stunning</emphasis>-looking bay, <break time="0.2s"/> stunningly calm. <break time="0.4s"/> Truly <emphasis level="strong">STUNNING</emphasis>!"#
        );
    }

    #[test]
    fn test_empty_input() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(format("", CommentaryStyle::Energetic, &mut rng), "");
        assert_eq!(format("<prosody rate=\"1.2\"> </prosody>", CommentaryStyle::Urdu, &mut rng), "");
    }
}
