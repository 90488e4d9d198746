use std::cell::Cell;

use cfg_if::cfg_if;

/// Monotonic source of elapsed time in seconds.
pub trait Clock {
    fn elapsed_secs(&self) -> f32;
}

/// Wall clock started when it is created.
pub struct SystemClock {
    start_ms: f64,
}

impl SystemClock {
    pub fn start() -> Self {
        Self { start_ms: now_ms() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SystemClock {
    fn elapsed_secs(&self) -> f32 {
        ((now_ms() - self.start_ms).max(0.0) / 1000.0) as f32
    }
}

cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        fn now_ms() -> f64 {
            web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.now())
                .unwrap_or(0.0)
        }
    } else {
        use once_cell::sync::Lazy;
        use std::time::Instant;

        static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

        fn now_ms() -> f64 {
            EPOCH.elapsed().as_secs_f64() * 1000.0
        }
    }
}

/// Clock advanced by hand, for deterministic runs.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<f32>,
}

impl ManualClock {
    pub fn at(secs: f32) -> Self {
        Self { now: Cell::new(secs) }
    }

    pub fn set(&self, secs: f32) {
        self.now.set(secs);
    }

    pub fn advance(&self, secs: f32) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn elapsed_secs(&self) -> f32 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::start();
        let a = clock.elapsed_secs();
        let b = clock.elapsed_secs();
        assert!(a >= 0.0);
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::at(1.0);
        clock.advance(0.5);
        assert_eq!(clock.elapsed_secs(), 1.5);
        clock.set(0.0);
        assert_eq!(clock.elapsed_secs(), 0.0);
    }
}
