// Copyright (c) 2025 - Cowboy AI, Inc.
//! Boot-Time Initialization Payload
//!
//! The instance carries an opaque first-boot script: install the serving
//! stack, write a one-shot inference driver, execute it once, and record
//! success or failure to fixed log paths. The script performs no retries and
//! exposes no serving port; a failure leaves the error log and a non-zero
//! exit code with no externally visible signal. The rest of the crate treats
//! the rendered text as opaque.

use serde::{Deserialize, Serialize};

/// Model selection for the verification inference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Hub identifier of the model to load
    pub model_id: String,

    /// Prompt for the one-shot verification run
    pub prompt: String,

    /// Generation length cap
    pub max_new_tokens: u32,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            model_id: "TinyLlama/TinyLlama-1.1B-Chat-v1.0".to_string(),
            prompt: "Briefly explain what a virtual private network is.".to_string(),
            max_new_tokens: 64,
        }
    }
}

/// First-boot initialization script
///
/// Rendered once at stack-render time and embedded into the instance
/// descriptor as plain text. The guest OS executes it exactly once at first
/// boot; this crate never runs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupScript {
    model: ModelSpec,
}

const SCRIPT_TEMPLATE: &str = r#"#!/bin/bash
# First-boot initialization: install the serving stack, run a one-shot
# verification inference, record the outcome. Runs once at first boot.
# NOTE: no serving endpoint is exposed; the driver exits after one request.
set -u

apt-get update
apt-get install -y python3-pip
pip3 install --break-system-packages torch transformers accelerate

cat > /opt/llm_driver.py <<'PYEOF'
import sys

SUCCESS_LOG = "@success_log@"
ERROR_LOG = "@error_log@"

try:
    from transformers import AutoModelForCausalLM, AutoTokenizer

    model_id = "@model_id@"
    tokenizer = AutoTokenizer.from_pretrained(model_id)
    model = AutoModelForCausalLM.from_pretrained(model_id)

    inputs = tokenizer("@prompt@", return_tensors="pt")
    output = model.generate(**inputs, max_new_tokens=@max_new_tokens@)
    text = tokenizer.decode(output[0], skip_special_tokens=True)

    with open(SUCCESS_LOG, "w") as f:
        f.write(text + "\n")
except Exception as exc:
    with open(ERROR_LOG, "w") as f:
        f.write(str(exc) + "\n")
    sys.exit(1)
PYEOF

python3 /opt/llm_driver.py
"#;

impl StartupScript {
    /// Fixed path the driver writes on success
    pub const SUCCESS_LOG: &'static str = "/var/log/llm-setup-success.log";

    /// Fixed path the driver writes on failure
    pub const ERROR_LOG: &'static str = "/var/log/llm-setup-error.log";

    /// Create a payload for the given model
    pub fn new(model: ModelSpec) -> Self {
        Self { model }
    }

    /// The model the payload verifies
    pub fn model(&self) -> &ModelSpec {
        &self.model
    }

    /// Render the payload text embedded into the instance descriptor
    pub fn render(&self) -> String {
        SCRIPT_TEMPLATE
            .replace("@success_log@", Self::SUCCESS_LOG)
            .replace("@error_log@", Self::ERROR_LOG)
            .replace("@model_id@", &self.model.model_id)
            .replace("@prompt@", &self.model.prompt.replace('"', "\\\""))
            .replace("@max_new_tokens@", &self.model.max_new_tokens.to_string())
    }
}

impl Default for StartupScript {
    fn default() -> Self {
        Self::new(ModelSpec::default())
    }
}
