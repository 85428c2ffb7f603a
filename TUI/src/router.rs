//! Fragment-driven view routing with a timed transition.
//!
//! The location fragment is the only router input. A fragment change that
//! resolves to a different view starts a transition; after the delay the new
//! view becomes active and the caller resets its scroll position.
//!
//! Overlapping navigations coalesce: while a transition is pending, a new
//! fragment replaces the pending target and keeps the original deadline.

use std::time::{Duration, Instant};

use tracing::debug;

pub const TRANSITION_DELAY: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Home,
    About,
    Projects,
    Journey,
    Contact,
    Services,
}

impl View {
    /// Navigation order, as shown in the nav bar.
    pub const ALL: [View; 6] = [
        View::Home,
        View::About,
        View::Services,
        View::Projects,
        View::Journey,
        View::Contact,
    ];

    pub fn fragment(self) -> &'static str {
        match self {
            View::Home => "home",
            View::About => "about",
            View::Projects => "projects",
            View::Journey => "journey",
            View::Contact => "contact",
            View::Services => "services",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::About => "About",
            View::Projects => "Work",
            View::Journey => "Journey",
            View::Contact => "Contact",
            View::Services => "Services",
        }
    }

    /// Exact match on a fragment, with or without the leading `#`.
    pub fn parse(fragment: &str) -> Option<View> {
        let name = fragment.strip_prefix('#').unwrap_or(fragment);
        View::ALL.into_iter().find(|v| v.fragment() == name)
    }

    /// Unknown or empty fragments land on `Home`.
    pub fn resolve(fragment: &str) -> View {
        View::parse(fragment).unwrap_or_default()
    }

    pub fn index(self) -> usize {
        View::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn next(self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn prev(self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    target: View,
    started: Instant,
    deadline: Instant,
}

#[derive(Debug)]
pub struct Router {
    active: View,
    fragment: String,
    pending: Option<Pending>,
    delay: Duration,
}

impl Router {
    /// First resolution on load: applied immediately, no transition.
    pub fn load(fragment: &str, delay: Duration) -> Self {
        let name = fragment.strip_prefix('#').unwrap_or(fragment);
        Self {
            active: View::resolve(name),
            fragment: name.to_string(),
            pending: None,
            delay,
        }
    }

    pub fn active_view(&self) -> View {
        self.active
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// View the pending transition will land on, if any.
    pub fn target(&self) -> Option<View> {
        self.pending.map(|p| p.target)
    }

    /// Change the location fragment. Like a browser, setting the same fragment
    /// again fires no navigation event. Returns whether an event fired.
    pub fn set_fragment(&mut self, fragment: &str, now: Instant) -> bool {
        let name = fragment.strip_prefix('#').unwrap_or(fragment);
        if name == self.fragment {
            return false;
        }
        self.fragment = name.to_string();
        self.on_navigation(now);
        true
    }

    pub fn go(&mut self, view: View, now: Instant) -> bool {
        self.set_fragment(view.fragment(), now)
    }

    fn on_navigation(&mut self, now: Instant) {
        let target = View::resolve(&self.fragment);
        if let Some(pending) = self.pending.as_mut() {
            debug!(from = ?pending.target, to = ?target, "coalescing navigation");
            pending.target = target;
            return;
        }
        if target != self.active {
            debug!(from = ?self.active, to = ?target, "transition started");
            self.pending = Some(Pending {
                target,
                started: now,
                deadline: now + self.delay,
            });
        }
    }

    /// Complete a due transition. Returns the view that just became active
    /// so the caller can reset scroll.
    pub fn tick(&mut self, now: Instant) -> Option<View> {
        let pending = self.pending?;
        if now < pending.deadline {
            return None;
        }
        self.pending = None;
        self.active = pending.target;
        debug!(view = ?self.active, "transition finished");
        Some(self.active)
    }

    /// Fraction of the delay elapsed, while transitioning.
    pub fn progress(&self, now: Instant) -> Option<f64> {
        self.pending.map(|p| {
            if self.delay.is_zero() {
                return 1.0;
            }
            let elapsed = now.saturating_duration_since(p.started).as_secs_f64();
            (elapsed / self.delay.as_secs_f64()).clamp(0.0, 1.0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_load_is_immediate() {
        let router = Router::load("projects", TRANSITION_DELAY);
        assert_eq!(router.active_view(), View::Projects);
        assert!(!router.is_transitioning());

        let router = Router::load("#journey", TRANSITION_DELAY);
        assert_eq!(router.active_view(), View::Journey);
    }

    #[test]
    fn test_unknown_or_empty_fragment_is_home() {
        assert_eq!(Router::load("nonexistent", TRANSITION_DELAY).active_view(), View::Home);
        assert_eq!(Router::load("", TRANSITION_DELAY).active_view(), View::Home);
        assert_eq!(View::resolve("Projects"), View::Home);
    }

    #[test]
    fn test_navigation_waits_for_delay() {
        let t0 = Instant::now();
        let mut router = Router::load("home", TRANSITION_DELAY);

        assert!(router.set_fragment("#contact", t0));
        assert!(router.is_transitioning());
        assert_eq!(router.active_view(), View::Home);

        assert_eq!(router.tick(t0 + ms(599)), None);
        assert_eq!(router.active_view(), View::Home);

        assert_eq!(router.tick(t0 + ms(600)), Some(View::Contact));
        assert_eq!(router.active_view(), View::Contact);
        assert!(!router.is_transitioning());
    }

    #[test]
    fn test_same_view_does_not_transition() {
        let t0 = Instant::now();
        let mut router = Router::load("", TRANSITION_DELAY);
        // "" -> "home" is a fragment change that resolves to the active view.
        assert!(router.set_fragment("home", t0));
        assert!(!router.is_transitioning());

        assert!(!router.set_fragment("home", t0));
        assert!(router.set_fragment("bogus", t0));
        assert!(!router.is_transitioning());
    }

    #[test]
    fn test_overlapping_navigation_coalesces_to_latest() {
        let t0 = Instant::now();
        let mut router = Router::load("home", TRANSITION_DELAY);
        router.go(View::About, t0);
        router.go(View::Services, t0 + ms(300));
        assert_eq!(router.target(), Some(View::Services));

        // The first deadline still applies.
        assert_eq!(router.tick(t0 + ms(600)), Some(View::Services));
        assert!(!router.is_transitioning());
    }

    #[test]
    fn test_navigating_back_mid_flight_completes_in_place() {
        let t0 = Instant::now();
        let mut router = Router::load("about", TRANSITION_DELAY);
        router.go(View::Journey, t0);
        router.go(View::About, t0 + ms(100));
        assert_eq!(router.tick(t0 + ms(600)), Some(View::About));
        assert_eq!(router.active_view(), View::About);
    }

    #[test]
    fn test_progress_runs_from_zero_to_one() {
        let t0 = Instant::now();
        let mut router = Router::load("home", TRANSITION_DELAY);
        assert_eq!(router.progress(t0), None);
        router.go(View::Projects, t0);
        assert_eq!(router.progress(t0), Some(0.0));
        let half = router.progress(t0 + ms(300)).unwrap();
        assert!((half - 0.5).abs() < 1e-9);
        assert_eq!(router.progress(t0 + ms(900)), Some(1.0));
    }

    #[test]
    fn test_view_cycle_wraps() {
        assert_eq!(View::Contact.next(), View::Home);
        assert_eq!(View::Home.prev(), View::Contact);
        for view in View::ALL {
            assert_eq!(View::parse(view.fragment()), Some(view));
        }
    }
}
