//! The Voices Performance Rubric sent to the model verbatim.
//!
//! Twenty-six metrics across four groups, each scored 1-7 against fixed
//! anchor wordings. The model owns the scoring semantics; this crate only
//! guarantees the reply is a single valid JSON object.

/// Number of metrics the rubric defines. Referenced by the continuation
/// instruction so a completed object can be checked for coverage by eye.
pub const METRIC_COUNT: usize = 26;

pub const RUBRIC_PROMPT: &str = r#"
Rate the attached audio performance using the Voices Performance Rubric (1-7 scale). Use the EXACT anchor wordings below when selecting scores. For each metric, provide:
- score (1-7)
- anchor_descriptor (quote the matching anchor text verbatim/near-verbatim)
- rationale (<= 25 words, tied to what you hear)
- coaching_tip (<= 20 words, one practical step)
If evidence is obvious, include brief time notes like "00:06 breath noise" when possible.

Return ONLY this top-level JSON:
{
  "summary": { "overall_comment": "...", "strengths": ["..."], "priorities": ["..."] },
  "scores": { "<Metric Name>": { "score": n, "anchor_descriptor": "...", "rationale": "...", "coaching_tip": "..." }, ... }
}

[Performance Expression]
Emotional Clarity: 1 Emotion not conveyed/confusing ... 7 Perfectly clear, immediately identifiable
Emotional Authenticity / Believability: 1 Very Poor ... 7 Excellent (compelling, professional-grade)
Emotional Intensity / Energy: 1 No emotional energy ... 7 Powerful, precisely balanced
Subtext / Inner Life: 1 Flat, no inner life ... 7 Deeply layered, fully present
Expressive Range: 1 Monotone/flat ... 7 Exceptional, nuanced range
Character Commitment: 1 Uncommitted ... 7 Completely immersed/transformative
Spontaneity / Naturalness: 1 Mechanical ... 7 Fully natural, reactive, present
Emotional Control: 1 Uncontrolled/erratic ... 7 Perfectly controlled/precise

[Vocal & Technical]
Vocal Clarity / Diction: 1 Mumbled ... 7 Crisp, precise throughout
Projection / Presence: 1 Weak/barely audible ... 7 Commanding presence with ease
Pacing / Rhythm: 1 Rushed/dragging ... 7 Masterful rhythm; phrasing elevates text
Pitch Variation / Prosody: 1 Monotone ... 7 Highly nuanced; emphasis perfect
Breath Control / Support: 1 Poor control ... 7 Flawless, effortless control
Technical Quality (Recording): 1 Noisy/clipping/unusable ... 7 Clean, quiet, studio-grade
Vocal Tone & Resonance Quality: 1 Harsh/unnatural ... 7 Excellent; rich, warm, well-resonant
Objective Vocal Stability (Jitter/Shimmer): 1 Severely unstable ... 7 Highly stable; clean/steady tone

[Interpretive]
Text Interpretation / Understanding: 1 Surface reading ... 7 Sophisticated; emphasis elevates text
Intent / Objective Clarity: 1 Objective unclear ... 7 Exceptionally focused/compelling
Listening / Reactivity: 1 Unresponsive ... 7 Fully engaged; truthful moment-to-moment
Storytelling Arc / Emotional Journey: 1 Static ... 7 Powerful, moving arc; memorable

[Overall Impact]
Presence / Charisma: 1 Disengaging ... 7 Utterly captivating; unforgettable
Uniqueness / Creativity of Choices: 1 Generic ... 7 Inventive/memorable; elevates material
Suitability / Casting Fit: 1 Miscast ... 7 Perfect fit; ideal for brief
Overall Impression / Professional Readiness: 1 Unprepared ... 7 Exceptional; industry-leading
Performance Consistency / Stamina: 1 Highly inconsistent ... 7 Rock-solid; last take as strong as first
Listener Engagement / Empathic Resonance: 1 Disengaging ... 7 Compelling/affecting; sustained immersion
"#;
