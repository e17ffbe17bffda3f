use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::config::Settings;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

const CHARACTER_MAX_TOKENS: u32 = 800;
const REPLY_MAX_TOKENS: u32 = 300;
const FEEDBACK_MAX_TOKENS: u32 = 1000;

// Only the trailing turns fit in the reply prompt.
const HISTORY_WINDOW: usize = 5;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("MissingApiKey")]
    MissingApiKey,
    #[error("Request")]
    Request(reqwest::Error),
    #[error("Status")]
    Status(u16, String),
    #[error("MalformedReply")]
    MalformedReply(String),
}

/// Role-play character sheet produced for a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub appearance: String,
    pub body_language: String,
    pub current_activity: String,
    pub personality_traits: Vec<String>,
    pub conversation_interests: Vec<String>,
    pub approach_style: String,
}

/// One in-character reply, with any `[bracketed]` body-language cue pulled
/// out of the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterReply {
    pub content: String,
    pub body_language: String,
    pub receptiveness: String,
    pub response_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionNote {
    pub message: String,
    pub feedback: String,
}

/// Post-session coaching feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFeedback {
    pub overall_score: i64,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub specific_suggestions: Vec<SuggestionNote>,
    pub conversation_flow_score: i64,
    pub confidence_level_score: i64,
    pub engagement_score: i64,
    pub next_practice_focus: String,
    pub encouragement: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub sender: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    pub scenario_type: String,
    pub difficulty_level: String,
    pub character: CharacterProfile,
}

#[derive(Debug, Clone)]
pub struct CharacterOutcome {
    pub success: bool,
    pub character: CharacterProfile,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReplyOutcome {
    pub success: bool,
    pub reply: CharacterReply,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FeedbackOutcome {
    pub success: bool,
    pub feedback: SessionFeedback,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationHealth {
    pub connected: bool,
    pub models_available: Option<usize>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<Value>,
}

/// Client for the upstream text-generation service.
///
/// Every operation degrades to a static fallback on timeout, transport
/// failure, bad status or unparseable content; failure reaches the caller
/// only as `success: false` plus the log.
pub struct GenerationClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    character_model: String,
    feedback_model: String,
}

impl GenerationClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.generation_base_url.clone(),
            api_key: settings.generation_api_key.clone(),
            character_model: settings.character_model.clone(),
            feedback_model: settings.feedback_model.clone(),
        }
    }

    pub async fn generate_character(
        &self,
        scenario_type: &str,
        difficulty_level: &str,
        target_gender: Option<&str>,
    ) -> CharacterOutcome {
        let prompt = character_prompt(scenario_type, difficulty_level, target_gender);

        match self
            .complete(&prompt, &self.character_model, CHARACTER_MAX_TOKENS, 0.7)
            .await
        {
            Ok(text) => CharacterOutcome {
                success: true,
                character: parse_character(&text, scenario_type, difficulty_level),
                error: None,
            },
            Err(err) => {
                tracing::error!("character generation failed: {err:?}");
                CharacterOutcome {
                    success: false,
                    character: fallback_character(scenario_type, difficulty_level),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub async fn generate_reply(
        &self,
        context: &ConversationContext,
        user_message: &str,
        history: &[ChatTurn],
    ) -> ReplyOutcome {
        let prompt = reply_prompt(context, user_message, history);

        match self
            .complete(&prompt, &self.character_model, REPLY_MAX_TOKENS, 0.8)
            .await
        {
            Ok(text) => ReplyOutcome {
                success: true,
                reply: parse_reply(&text, &context.difficulty_level),
                error: None,
            },
            Err(err) => {
                tracing::error!("reply generation failed: {err:?}");
                ReplyOutcome {
                    success: false,
                    reply: fallback_reply(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub async fn generate_feedback(
        &self,
        history: &[ChatTurn],
        user_goals: &[String],
        scenario_type: &str,
    ) -> FeedbackOutcome {
        let prompt = feedback_prompt(history, user_goals, scenario_type);

        match self
            .complete(&prompt, &self.feedback_model, FEEDBACK_MAX_TOKENS, 0.3)
            .await
        {
            Ok(text) => FeedbackOutcome {
                success: true,
                feedback: parse_feedback(&text),
                error: None,
            },
            Err(err) => {
                tracing::error!("feedback generation failed: {err:?}");
                FeedbackOutcome {
                    success: false,
                    feedback: fallback_feedback(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub async fn health_check(&self) -> GenerationHealth {
        let api_key = match self.api_key.as_deref() {
            Some(api_key) => api_key,
            None => {
                return GenerationHealth {
                    connected: false,
                    models_available: None,
                    error: Some("api key not configured".into()),
                }
            }
        };

        let response = self
            .http
            .get(format!("{}/models", self.base_url))
            .bearer_auth(api_key)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                let models = response
                    .json::<ModelList>()
                    .await
                    .ok()
                    .map(|list| list.data.len());
                GenerationHealth {
                    connected: true,
                    models_available: models,
                    error: None,
                }
            }
            Ok(response) => GenerationHealth {
                connected: false,
                models_available: None,
                error: Some(format!("HTTP {}", response.status().as_u16())),
            },
            Err(err) => GenerationHealth {
                connected: false,
                models_available: None,
                error: Some(err.to_string()),
            },
        }
    }

    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;
        let body = completion_body(model, prompt, max_tokens, temperature);

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(GenerationError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status(status.as_u16(), detail));
        }

        let completion: ChatCompletion =
            response.json().await.map_err(GenerationError::Request)?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::MalformedReply("no choices in completion".into()))
    }
}

fn completion_body(model: &str, prompt: &str, max_tokens: u32, temperature: f64) -> Value {
    json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
        "max_tokens": max_tokens,
        "temperature": temperature,
        "top_p": 1,
        "frequency_penalty": 0,
        "presence_penalty": 0,
    })
}

fn scenario_description(scenario_type: &str) -> &'static str {
    match scenario_type {
        "coffee_shop" => "a cozy coffee shop with soft background music",
        "bookstore" => "a quiet bookstore with tall shelves and reading nooks",
        "park" => "a sunny park with walking paths and outdoor activities",
        "campus" => "a university campus with students and academic atmosphere",
        "grocery" => "a grocery store during a casual shopping trip",
        "gym" => "a fitness center with workout equipment and active atmosphere",
        "bar" => "a social bar or pub with lively conversation",
        "gallery" => "an art gallery or cultural event with sophisticated atmosphere",
        _ => "a social setting",
    }
}

fn difficulty_description(difficulty_level: &str) -> &'static str {
    match difficulty_level {
        "green" => "very approachable and clearly interested in conversation",
        "yellow" => "polite but neutral, requiring some effort to engage",
        "red" => "busy or distracted, requiring skillful and respectful approach",
        _ => "moderately approachable",
    }
}

fn receptiveness_for(difficulty_level: &str) -> &'static str {
    match difficulty_level {
        "green" => "highly receptive",
        "red" => "low receptiveness",
        _ => "moderately receptive",
    }
}

fn character_prompt(
    scenario_type: &str,
    difficulty_level: &str,
    target_gender: Option<&str>,
) -> String {
    let scenario_desc = scenario_description(scenario_type);
    let difficulty_desc = difficulty_description(difficulty_level);

    let gender_text = match target_gender {
        Some("male") => "Create a male character.",
        Some("female") => "Create a female character.",
        _ => "",
    };

    format!(
        "You are creating a realistic character for a conversation practice scenario in \
{scenario_desc}. The character should be {difficulty_desc}.

{gender_text}

Please provide:
1. Physical appearance (age, style, what they're wearing/doing)
2. Body language that matches the {difficulty_level} difficulty level
3. Current activity or what they're focused on
4. Personality traits that would influence how they respond to approaches
5. Potential conversation topics they might be interested in

Keep the description natural and realistic. The character should feel like a real person \
someone might encounter in this setting.

Format your response as a JSON object with these keys:
- \"appearance\": Physical description
- \"body_language\": Current body language and demeanor
- \"current_activity\": What they're doing right now
- \"personality_traits\": List of 3-4 key personality traits
- \"conversation_interests\": List of topics they'd be interested in discussing
- \"approach_style\": How they typically respond to people approaching them
"
    )
}

fn reply_prompt(context: &ConversationContext, user_message: &str, history: &[ChatTurn]) -> String {
    let character = &context.character;

    let mut history_text = String::new();
    let tail_start = history.len().saturating_sub(HISTORY_WINDOW);
    for turn in &history[tail_start..] {
        let role = if turn.sender == "user" { "User" } else { "AI" };
        history_text.push_str(&format!("{role}: {}\n", turn.content));
    }

    format!(
        "You are roleplaying as a character in a {scenario} scenario. Here are your \
character details:

Character: {appearance}
Body Language: {body_language}
Current Activity: {current_activity}
Personality: {personality}
Interests: {interests}

Difficulty Level: {difficulty} (this affects how receptive you are to conversation)

Previous conversation:
{history_text}

The user just said: \"{user_message}\"

Respond as this character would, staying true to their personality and the difficulty \
level. Your response should:
1. Be natural and realistic for this scenario
2. Match your character's personality and current mood
3. Reflect the appropriate level of interest based on difficulty
4. Include subtle body language cues in [brackets] if relevant
5. Keep responses conversational and not too long (1-3 sentences typically)

Response:",
        scenario = context.scenario_type,
        appearance = character.appearance,
        body_language = character.body_language,
        current_activity = character.current_activity,
        personality = character.personality_traits.join(", "),
        interests = character.conversation_interests.join(", "),
        difficulty = context.difficulty_level,
    )
}

fn feedback_prompt(history: &[ChatTurn], user_goals: &[String], scenario_type: &str) -> String {
    let mut conversation_text = String::new();
    for turn in history {
        let role = if turn.sender == "user" {
            "User"
        } else {
            "AI Partner"
        };
        conversation_text.push_str(&format!("{role}: {}\n", turn.content));
    }

    let goals_text = if user_goals.is_empty() {
        "general conversation skills".to_string()
    } else {
        user_goals.join(", ")
    };

    format!(
        "You are a conversation coach providing feedback on a practice conversation.

Scenario: {scenario_type}
User's Goals: {goals_text}

Conversation:
{conversation_text}

Please provide detailed feedback in JSON format with these categories:

{{
  \"overall_score\": (1-100 integer score),
  \"strengths\": [\"strength1\", \"strength2\", \"strength3\"],
  \"areas_for_improvement\": [\"area1\", \"area2\", \"area3\"],
  \"specific_suggestions\": [
    {{\"message\": \"specific user message\", \"feedback\": \"how to improve it\"}}
  ],
  \"conversation_flow_score\": (1-100),
  \"confidence_level_score\": (1-100),
  \"engagement_score\": (1-100),
  \"next_practice_focus\": \"main area to work on next\",
  \"encouragement\": \"positive encouragement message\"
}}

Focus on constructive feedback that helps the user improve their conversation skills."
    )
}

fn parse_character(text: &str, scenario_type: &str, difficulty_level: &str) -> CharacterProfile {
    match serde_json::from_str(text) {
        Ok(profile) => profile,
        Err(_) => fallback_character(scenario_type, difficulty_level),
    }
}

fn cue_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[(.*?)\]").expect("cue pattern"))
}

fn parse_reply(text: &str, difficulty_level: &str) -> CharacterReply {
    let pattern = cue_pattern();
    let body_language = pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|cue| cue.as_str().to_string())
        .unwrap_or_default();
    let content = pattern.replace_all(text, "").trim().to_string();

    CharacterReply {
        content,
        body_language,
        receptiveness: receptiveness_for(difficulty_level).to_string(),
        response_type: "conversational".to_string(),
    }
}

fn parse_feedback(text: &str) -> SessionFeedback {
    match serde_json::from_str(text) {
        Ok(feedback) => feedback,
        Err(_) => fallback_feedback(),
    }
}

fn fallback_character(scenario_type: &str, difficulty_level: &str) -> CharacterProfile {
    let body_language = match difficulty_level {
        "green" => "Relaxed and approachable",
        "yellow" => "Focused but polite",
        _ => "Busy and distracted",
    };

    CharacterProfile {
        appearance: "An attractive person in their twenties with a welcoming presence".into(),
        body_language: body_language.into(),
        current_activity: format!(
            "Enjoying their time in this {}",
            scenario_type.replace('_', " ")
        ),
        personality_traits: vec!["Friendly".into(), "Interesting".into(), "Conversational".into()],
        conversation_interests: vec![
            "Travel".into(),
            "Books".into(),
            "Local area".into(),
            "Current events".into(),
        ],
        approach_style: "Responds well to genuine, respectful conversation".into(),
    }
}

fn fallback_reply() -> CharacterReply {
    CharacterReply {
        content: "That's interesting! Tell me more about that.".into(),
        body_language: "maintains eye contact and leans in slightly".into(),
        receptiveness: "moderately receptive".into(),
        response_type: "conversational".into(),
    }
}

fn fallback_feedback() -> SessionFeedback {
    SessionFeedback {
        overall_score: 75,
        strengths: vec!["Good effort in practicing".into(), "Maintaining conversation".into()],
        areas_for_improvement: vec![
            "Continue practicing".into(),
            "Work on conversation flow".into(),
        ],
        specific_suggestions: Vec::new(),
        conversation_flow_score: 70,
        confidence_level_score: 75,
        engagement_score: 75,
        next_practice_focus: "Keep practicing regularly".into(),
        encouragement: "You're doing great! Keep practicing to build your confidence.".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ConversationContext {
        ConversationContext {
            scenario_type: "coffee_shop".into(),
            difficulty_level: "green".into(),
            character: fallback_character("coffee_shop", "green"),
        }
    }

    #[test]
    fn completion_body_matches_the_wire_contract() {
        let body = completion_body("anthropic/claude-3-haiku", "hello", 300, 0.8);

        assert_eq!(body["model"], "anthropic/claude-3-haiku");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["max_tokens"], 300);
        assert_eq!(body["temperature"], 0.8);
        assert_eq!(body["top_p"], 1);
    }

    #[test]
    fn well_formed_character_json_parses_through() {
        let text = serde_json::to_string(&fallback_character("park", "yellow")).unwrap();
        let profile = parse_character(&text, "coffee_shop", "green");
        assert_eq!(profile.body_language, "Focused but polite");
    }

    #[test]
    fn unparseable_character_text_takes_the_difficulty_shaped_fallback() {
        let profile = parse_character("She seemed nice, I guess?", "coffee_shop", "red");
        assert_eq!(profile.body_language, "Busy and distracted");
        assert!(profile.current_activity.contains("coffee shop"));
    }

    #[test]
    fn reply_parsing_extracts_the_bracketed_cue() {
        let reply = parse_reply("[glances up from her book] Oh, hi there!", "green");
        assert_eq!(reply.body_language, "glances up from her book");
        assert_eq!(reply.content, "Oh, hi there!");
        assert_eq!(reply.receptiveness, "highly receptive");
    }

    #[test]
    fn reply_without_a_cue_keeps_the_text_whole() {
        let reply = parse_reply("Sure, the flat white here is great.", "yellow");
        assert_eq!(reply.body_language, "");
        assert_eq!(reply.content, "Sure, the flat white here is great.");
        assert_eq!(reply.receptiveness, "moderately receptive");
    }

    #[test]
    fn feedback_parsing_round_trips_and_falls_back() {
        let text = serde_json::to_string(&fallback_feedback()).unwrap();
        assert_eq!(parse_feedback(&text), fallback_feedback());
        assert_eq!(parse_feedback("thanks, good chat"), fallback_feedback());
    }

    #[test]
    fn reply_prompt_keeps_only_the_trailing_turns() {
        let history: Vec<ChatTurn> = (0..8)
            .map(|i| ChatTurn {
                sender: "user".into(),
                content: format!("turn-{i}"),
            })
            .collect();

        let prompt = reply_prompt(&context(), "hello", &history);
        assert!(!prompt.contains("turn-2"));
        assert!(prompt.contains("turn-3"));
        assert!(prompt.contains("turn-7"));
    }

    #[test]
    fn unknown_scenarios_get_the_generic_setting() {
        let prompt = character_prompt("space_station", "green", None);
        assert!(prompt.contains("a social setting"));
        assert!(prompt.contains("clearly interested in conversation"));
    }

    #[test]
    fn gender_preference_lands_in_the_prompt() {
        assert!(character_prompt("bar", "green", Some("female"))
            .contains("Create a female character."));
        assert!(!character_prompt("bar", "green", None).contains("Create a"));
    }
}
