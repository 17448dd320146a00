use serde::Deserialize;
use serde_json::json;

use crate::config::{AdvisorConfig, ServerSpec};
use crate::remote::run_remote;

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Optional disk-usage analysis for new disk alerts. Everything here is
/// best-effort: any failure, timeout or parse miss degrades to "no note" and
/// the alert goes out unenriched.
pub struct DiskAdvisor {
    config: AdvisorConfig,
    client: reqwest::Client,
}

impl DiskAdvisor {
    pub fn from_config(config: &AdvisorConfig) -> Option<Self> {
        if !config.enabled || config.api_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            config: config.clone(),
            client: reqwest::Client::new(),
        })
    }

    /// Gather df/du context over SSH and ask for cleanup suggestions.
    pub async fn disk_note(
        &self,
        server: &ServerSpec,
        mount: &str,
        used_percent: f32,
        timeout_secs: u64,
    ) -> Option<String> {
        let df_output = match run_remote(server, "df -h", timeout_secs).await {
            Ok(output) => output.stdout,
            Err(error) => {
                log::warn!(
                    "advisor_context_failed server={} step=df error={}",
                    server.nickname,
                    error
                );
                return None;
            }
        };

        let du_command = format!(
            "du -x -d1 '{}' 2>/dev/null | sort -rn | head -20",
            mount.replace('\'', "")
        );
        let du_output = match run_remote(server, &du_command, timeout_secs).await {
            Ok(output) => output.stdout,
            Err(error) => {
                log::warn!(
                    "advisor_context_failed server={} step=du error={}",
                    server.nickname,
                    error
                );
                return None;
            }
        };

        let suggestion = self
            .analyze(&server.nickname, mount, used_percent, &du_output, &df_output)
            .await?;
        Some(format_suggestion(&suggestion))
    }

    async fn analyze(
        &self,
        server_name: &str,
        mount: &str,
        used_percent: f32,
        du_output: &str,
        df_output: &str,
    ) -> Option<String> {
        let prompt = format!(
            "You are a Linux system administrator helping to analyze disk usage issues.\n\n\
             Server: {}\nFilesystem: {}\nCurrent Usage: {}%\n\n\
             Disk usage summary (df -h):\n{}\n\n\
             Top directories by size (du):\n{}\n\n\
             Please analyze this disk usage data and provide:\n\
             1. The most likely causes of high disk usage\n\
             2. Specific directories or files that appear to be consuming excessive space\n\
             3. Safe cleanup suggestions (logs, caches, temp files)\n\
             4. Any patterns or anomalies you notice\n\n\
             Keep your response concise and actionable, focusing on the most important findings.",
            server_name, mount, used_percent, df_output, du_output
        );

        let body = json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a helpful Linux system administrator specializing in disk usage analysis and optimization."
                },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.3,
            "max_tokens": 500
        });

        let response = self
            .client
            .post(OPENROUTER_URL)
            .bearer_auth(&self.config.api_key)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(error) => {
                log::warn!("advisor_request_failed server={} error={}", server_name, error);
                return None;
            }
        };

        if !response.status().is_success() {
            log::warn!(
                "advisor_request_failed server={} status={}",
                server_name,
                response.status()
            );
            return None;
        }

        match response.json::<ChatResponse>().await {
            Ok(parsed) => {
                let content = parsed.choices.into_iter().next()?.message.content;
                log::info!("advisor_suggestion_generated server={} mount={}", server_name, mount);
                Some(content)
            }
            Err(error) => {
                log::warn!("advisor_response_invalid server={} error={}", server_name, error);
                None
            }
        }
    }
}

fn format_suggestion(suggestion: &str) -> String {
    format!(
        "🤖 AI Analysis:\n{}\n{}\n{}",
        "-".repeat(40),
        suggestion.trim(),
        "-".repeat(40)
    )
}

#[cfg(test)]
mod tests {
    use crate::config::AdvisorConfig;

    use super::{format_suggestion, DiskAdvisor};

    #[test]
    fn disabled_or_keyless_config_yields_no_advisor() {
        let disabled = AdvisorConfig {
            enabled: false,
            api_key: "sk-test".to_string(),
            model: "m".to_string(),
        };
        assert!(DiskAdvisor::from_config(&disabled).is_none());

        let keyless = AdvisorConfig {
            enabled: true,
            api_key: String::new(),
            model: "m".to_string(),
        };
        assert!(DiskAdvisor::from_config(&keyless).is_none());
    }

    #[test]
    fn suggestion_formatting_adds_the_analysis_frame() {
        let formatted = format_suggestion("  Clear /var/log/journal.  ");
        assert!(formatted.starts_with("🤖 AI Analysis:\n"));
        assert!(formatted.contains("Clear /var/log/journal."));
    }
}
