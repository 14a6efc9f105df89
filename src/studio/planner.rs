// CHRONOREEL Script Planner
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL
//
// Asks an OpenAI-compatible chat endpoint for the segment plan. Candidate
// models are probed in order; the first one that answers writes the script.

use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::error::{ReelError, Result};
use crate::pipeline::catalog::VideoPlan;

pub const DEFAULT_MODELS: [&str; 4] = ["llama3:latest", "gpt-oss:20b", "mistral:latest", "qwen2.5:latest"];

pub struct ScriptPlanner {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    models: Vec<String>,
}

impl ScriptPlanner {
    pub fn new(api_url: &str, api_key: Option<String>, models: Vec<String>) -> Self {
        let models = if models.is_empty() {
            DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
        } else {
            models
        };
        Self {
            client: http_client(DEFAULT_REQUEST_TIMEOUT),
            api_url: api_url.to_string(),
            api_key,
            models,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }

    async fn chat(&self, model: &str, prompt: &str) -> Result<String> {
        let payload = json!({
            "model": model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a documentary director. Respond with JSON only."
                },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.7
        });
        let endpoint = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));

        let mut request = self.client.post(&endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ReelError::Planner(format!("connection to {} failed: {}", endpoint, e)))?;
        if !resp.status().is_success() {
            return Err(ReelError::Planner(format!("API error: {}", resp.status())));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ReelError::Planner(e.to_string()))?;
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ReelError::Planner("empty completion".to_string()))
    }

    pub async fn find_working_model(&self) -> Result<String> {
        info!("[PLANNER] 🔍 Probing {} candidate models...", self.models.len());
        for model in &self.models {
            match self.chat(model, "test").await {
                Ok(_) => {
                    info!("[PLANNER] ✅ {} works", model);
                    return Ok(model.clone());
                }
                Err(e) => warn!("[PLANNER] ❌ {} failed: {}", model, e),
            }
        }
        Err(ReelError::Planner("no working model found".to_string()))
    }

    pub async fn generate_plan(&self, topic: &str) -> Result<VideoPlan> {
        let model = self.find_working_model().await?;
        info!("[PLANNER] 🔥 Generating script for '{}' with {}", topic, model);

        let reply = self.chat(&model, &documentary_prompt(topic)).await?;
        parse_plan(&reply)
    }
}

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

pub fn documentary_prompt(topic: &str) -> String {
    format!(
        r#"You are a documentary director creating a script for: "{topic}".
CRITICAL CONSTRAINT: The video must be exactly 2 minutes (approx 8 segments).

THEME TRANSITION:
- START (1926): Dark, Coal Black, Vintage Monochrome.
- END (2026): Vibrant Red, Fire/Energy.

MANDATORY TIMELINE:
1. 1926: Founding (Black/White).
2. 1957: Expansion.
3. 1976: Golden Jubilee.
4. 2016: New Status.
5. 2026: Centenary Celebration (Glowing Red).

OUTPUT JSON FORMAT:
{{
    "segments": [
        {{
            "id": 1,
            "narration": "...",
            "image_prompt": "..."
        }}
    ]
}}"#
    )
}

/// Strips markdown fences and anything outside the outermost braces.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

pub fn parse_plan(reply: &str) -> Result<VideoPlan> {
    let json = extract_json_object(reply)
        .ok_or_else(|| ReelError::Planner("reply contains no JSON object".to_string()))?;
    let plan: VideoPlan = serde_json::from_str(json)
        .map_err(|e| ReelError::Planner(format!("invalid plan JSON: {}", e)))?;
    if plan.segments.is_empty() {
        return Err(ReelError::Planner("plan has no segments".to_string()));
    }
    Ok(plan)
}

pub fn write_plan(plan: &VideoPlan, output: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(plan).map_err(|source| ReelError::Serialize {
        path: output.to_path_buf(),
        source,
    })?;
    fs::write(output, json).map_err(|e| ReelError::io(output, e))?;
    info!("[PLANNER] 🎉 Script saved to {:?}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_reply() {
        let reply = "Sure! Here it is:\n```json\n{\"segments\": [{\"id\": 1, \"narration\": \"In 1926...\", \"image_prompt\": \"gate\"}]}\n```\nEnjoy.";
        let plan = parse_plan(reply).unwrap();
        assert_eq!(plan.segments.len(), 1);
        assert_eq!(plan.segments[0].narration, "In 1926...");
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert!(parse_plan("no json here").is_err());
        assert!(parse_plan("{\"segments\": []}").is_err());
        assert!(extract_json_object("} backwards {").is_none());
    }

    #[test]
    fn test_prompt_mentions_topic() {
        let p = documentary_prompt("The Centenary of IIT (ISM) Dhanbad");
        assert!(p.contains("\"The Centenary of IIT (ISM) Dhanbad\""));
        assert!(p.contains("\"segments\""));
    }
}
