use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::NarrationError, language::Language};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentaryStyle {
    #[default]
    Documentary,
    Energetic,
    Analytical,
    Storyteller,
    Urdu,
}

/// Prompt text and speech pacing that make up one commentary style
#[derive(Debug)]
pub struct StyleProfile {
    /// Persona appended to the system instruction
    pub persona: &'static str,
    /// Narrative guidance appended to the user prompt
    pub guidance: &'static str,
    pub fillers: &'static [&'static str],
    pub transitions: &'static [&'static str],
    pub emphasis: &'static [&'static str],
    /// Probability of a midpoint pause in a long sentence
    pub pause_frequency: f64,
    pub filler_probability: f64,
    pub transition_probability: f64,
    pub emphasis_probability: f64,
    pub temperature: f32,
    /// Language the style is written for, if it is tied to one
    pub native_language: Option<Language>,
}

impl StyleProfile {
    pub fn uses_script_of(&self, language: Language) -> bool {
        self.native_language
            .is_some_and(|native| native.script() == language.script())
    }
}

static DOCUMENTARY: StyleProfile = StyleProfile {
    persona: r#"Create an informative, well-researched commentary that:
- Uses formal language appropriate for documentaries
- Provides context and background information
- Keeps an authoritative but engaging tone
- Focuses on educational value
- Balances facts with an engaging narrative
Example: "This remarkable phenomenon we're witnessing...""#,
    guidance: r#"DOCUMENTARY APPROACH:
- Present information with authority
- Provide context where relevant
- Use formal but engaging language
- Create educational value
- Balance facts with narrative"#,
    fillers: &[
        "You know what...",
        "Check this out...",
        "Oh wow...",
        "Look at that...",
        "This is fascinating...",
    ],
    transitions: &[
        "And here's the amazing part...",
        "Now watch this...",
        "See how...",
    ],
    emphasis: &["absolutely", "incredibly", "fascinating", "remarkable"],
    pause_frequency: 0.4,
    filler_probability: 0.3,
    transition_probability: 0.25,
    emphasis_probability: 0.2,
    temperature: 0.7,
    native_language: None,
};

static ENERGETIC: StyleProfile = StyleProfile {
    persona: r#"Deliver high-energy, engaging commentary that:
- Matches the excitement level of the content
- Uses dynamic and varied expressions
- Builds momentum and anticipation
- Emphasizes dramatic moments
- Stays authentic without going over the top
Example: "You won't believe what happens next...""#,
    guidance: r#"ENERGETIC APPROACH:
- Match the excitement level of the content
- Build anticipation naturally
- Use dynamic expressions
- Create momentum
- Keep the enthusiasm authentic"#,
    fillers: &[
        "Oh my gosh...",
        "This is insane...",
        "I can't even...",
        "Just wait...",
        "Are you seeing this...",
    ],
    transitions: &[
        "But wait there's more...",
        "And then...",
        "This is the best part...",
    ],
    emphasis: &["literally", "absolutely", "totally", "completely"],
    pause_frequency: 0.2,
    filler_probability: 0.3,
    transition_probability: 0.25,
    emphasis_probability: 0.2,
    temperature: 0.8,
    native_language: None,
};

static ANALYTICAL: StyleProfile = StyleProfile {
    persona: r#"Provide detailed, insightful analysis that:
- Breaks down complex aspects of the content
- Identifies patterns and connections
- Uses precise, technical language when appropriate
- Offers thoughtful observations
- Stays objective while remaining engaging
Example: "Notice how this particular aspect...""#,
    guidance: r#"ANALYTICAL APPROACH:
- Break down key elements
- Identify patterns
- Use precise language
- Offer insights
- Keep an engaging objectivity"#,
    fillers: &[
        "Interestingly...",
        "You see...",
        "What's fascinating here...",
        "Notice how...",
    ],
    transitions: &[
        "Let's look at this...",
        "Here's what's happening...",
        "The key detail is...",
    ],
    emphasis: &["particularly", "specifically", "notably", "precisely"],
    pause_frequency: 0.5,
    filler_probability: 0.3,
    transition_probability: 0.25,
    emphasis_probability: 0.2,
    temperature: 0.6,
    native_language: None,
};

static STORYTELLER: StyleProfile = StyleProfile {
    persona: r#"Craft a narrative-driven commentary that:
- Builds emotional connections with the content
- Creates a story arc within the commentary
- Uses descriptive, evocative language
- Emphasizes human elements
- Keeps the flow and pacing natural
Example: "Let me tell you about this incredible moment...""#,
    guidance: r#"STORYTELLING APPROACH:
- Create narrative flow
- Build emotional connections
- Use descriptive language
- Emphasize human elements
- Keep the pacing engaging"#,
    fillers: &[
        "You know...",
        "Picture this...",
        "Here's the thing...",
        "Imagine...",
    ],
    transitions: &[
        "And this is where...",
        "That's when...",
        "The beautiful part is...",
    ],
    emphasis: &["magical", "wonderful", "touching", "heartwarming"],
    pause_frequency: 0.3,
    filler_probability: 0.3,
    transition_probability: 0.25,
    emphasis_probability: 0.2,
    temperature: 0.75,
    native_language: None,
};

static URDU: StyleProfile = StyleProfile {
    persona: r#"Create culturally appropriate Urdu commentary that:
- Uses natural, flowing Urdu expressions
- Adapts its tone to the formality of the content
- Brings in poetic elements when suitable
- Stays culturally sensitive
- Balances formal and casual language
Example: "دیکھیے کیسے یہ خوبصورت منظر...""#,
    guidance: r#"URDU NARRATION APPROACH:
- Use authentic Urdu expressions and idioms
- Use formal Urdu for serious topics and conversational Urdu for casual content
- Bring in culturally relevant metaphors and appropriate honorifics
- Follow proper Urdu sentence structure with natural pauses and emphasis
- Open with phrases like "دیکھیے" or "ملاحظہ کیجیے"
- Use emotional expressions like "واہ واہ" and rhetorical questions for engagement
- Transition with "اس کے بعد", emphasize with "خاص طور پر", conclude with "یوں یہ منظر"
- End with an impactful conclusion"#,
    fillers: &["دیکھیں...", "ارے واہ...", "سنیں تو...", "کیا بات ہے..."],
    transitions: &["اور پھر...", "اس کے بعد...", "سب سے اچھی بات..."],
    emphasis: &["بالکل", "یقیناً", "واقعی", "بےحد"],
    pause_frequency: 0.3,
    filler_probability: 0.3,
    transition_probability: 0.25,
    emphasis_probability: 0.2,
    temperature: 0.7,
    native_language: Some(Language::Urdu),
};

impl CommentaryStyle {
    pub const ALL: [CommentaryStyle; 5] = [
        CommentaryStyle::Documentary,
        CommentaryStyle::Energetic,
        CommentaryStyle::Analytical,
        CommentaryStyle::Storyteller,
        CommentaryStyle::Urdu,
    ];

    /// Lookup key used on the command line and in artifact names
    pub fn key(&self) -> &'static str {
        match self {
            CommentaryStyle::Documentary => "documentary",
            CommentaryStyle::Energetic => "energetic",
            CommentaryStyle::Analytical => "analytical",
            CommentaryStyle::Storyteller => "storyteller",
            CommentaryStyle::Urdu => "urdu",
        }
    }

    pub fn profile(&self) -> &'static StyleProfile {
        match self {
            CommentaryStyle::Documentary => &DOCUMENTARY,
            CommentaryStyle::Energetic => &ENERGETIC,
            CommentaryStyle::Analytical => &ANALYTICAL,
            CommentaryStyle::Storyteller => &STORYTELLER,
            CommentaryStyle::Urdu => &URDU,
        }
    }
}

impl fmt::Display for CommentaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CommentaryStyle {
    type Err = NarrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.key() == wanted)
            .ok_or_else(|| NarrationError::UnknownStyle {
                name: s.to_string(),
            })
    }
}
