use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use shared::AppConfig;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Local,
    Network,
    Core,
}

impl SourceKind {
    /// 候选顺序
    pub const ALL: [SourceKind; 3] = [SourceKind::Local, SourceKind::Network, SourceKind::Core];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Local => "local",
            SourceKind::Network => "network",
            SourceKind::Core => "core",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "storage" => Ok(SourceKind::Local),
            "network" => Ok(SourceKind::Network),
            "core" => Ok(SourceKind::Core),
            other => Err(AppError::ConfigError(format!("unknown data source: {}", other))),
        }
    }
}

/// 决定本次调用是否短路，以及由哪个数据源处理
pub trait SourceSelector: Send + Sync + fmt::Debug {
    fn short_circuit(&self) -> bool;

    /// 仅当 `candidates` 为空时返回 `None`
    fn pick(&self, candidates: &[SourceKind]) -> Option<SourceKind>;
}

#[derive(Debug)]
pub struct RandomSelector {
    gate_probability: f64,
    pinned: Option<SourceKind>,
    // None 时使用 thread_rng
    rng: Option<Mutex<StdRng>>,
}

impl RandomSelector {
    pub fn new(gate_probability: f64) -> Result<Self, AppError> {
        if !(0.0..=1.0).contains(&gate_probability) {
            return Err(AppError::ConfigError(format!(
                "gate probability must be within [0, 1], got {}",
                gate_probability
            )));
        }

        Ok(Self {
            gate_probability,
            pinned: None,
            rng: None,
        })
    }

    pub fn seeded(gate_probability: f64, seed: u64) -> Result<Self, AppError> {
        let mut selector = Self::new(gate_probability)?;
        selector.rng = Some(Mutex::new(StdRng::seed_from_u64(seed)));
        Ok(selector)
    }

    /// 固定数据源，短路仍按概率
    pub fn pin(mut self, kind: SourceKind) -> Self {
        self.pinned = Some(kind);
        self
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self, AppError> {
        let selector = match cfg.seed {
            Some(seed) => Self::seeded(cfg.gate_probability, seed)?,
            None => Self::new(cfg.gate_probability)?,
        };

        match cfg.pinned_source.as_deref() {
            Some(raw) => Ok(selector.pin(raw.parse()?)),
            None => Ok(selector),
        }
    }

    pub fn gate_probability(&self) -> f64 {
        self.gate_probability
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
        match &self.rng {
            Some(rng) => {
                let mut guard = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                f(&mut *guard)
            }
            None => f(&mut rand::thread_rng()),
        }
    }
}

impl SourceSelector for RandomSelector {
    fn short_circuit(&self) -> bool {
        let p = self.gate_probability;
        self.with_rng(|rng| rng.gen_bool(p))
    }

    fn pick(&self, candidates: &[SourceKind]) -> Option<SourceKind> {
        if let Some(kind) = self.pinned {
            if candidates.contains(&kind) {
                return Some(kind);
            }
        }
        self.with_rng(|rng| candidates.choose(rng).copied())
    }
}

/// 完全确定的选择器
#[derive(Debug, Clone, Copy)]
pub struct PinnedSelector {
    gate: bool,
    kind: SourceKind,
}

impl PinnedSelector {
    pub fn new(kind: SourceKind) -> Self {
        Self { gate: false, kind }
    }

    pub fn gated() -> Self {
        Self {
            gate: true,
            kind: SourceKind::Local,
        }
    }
}

impl SourceSelector for PinnedSelector {
    fn short_circuit(&self) -> bool {
        self.gate
    }

    fn pick(&self, candidates: &[SourceKind]) -> Option<SourceKind> {
        if candidates.contains(&self.kind) {
            Some(self.kind)
        } else {
            candidates.first().copied()
        }
    }
}
