//! Health bookkeeping and the non-owning handles agents use to refer to each
//! other.

/// Stable handle of the player.  There is only ever one, but it is kept as a
/// type so vehicles and events can name their occupant without owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

/// Stable handle of an enemy; never reused within one battlefield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u32);

/// Stable handle of a vehicle; never reused within one battlefield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u32);

/// Any damageable agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRef {
    Player(PlayerId),
    Enemy(EnemyId),
    Vehicle(VehicleId),
}

/// Result of a single damage application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Nothing changed: the amount was not positive or the agent was already
    /// dead.
    Ignored,
    /// Health dropped by `dealt` and the agent survived.
    Wounded { dealt: f32 },
    /// Health dropped by `dealt` and reached 0.
    Killed { dealt: f32 },
}

impl DamageOutcome {
    pub fn dealt(&self) -> f32 {
        match *self {
            DamageOutcome::Ignored => 0.0,
            DamageOutcome::Wounded { dealt } | DamageOutcome::Killed { dealt } => dealt,
        }
    }

    pub fn is_kill(&self) -> bool {
        matches!(self, DamageOutcome::Killed { .. })
    }
}

/// Current and maximum health.  `0 ≤ current ≤ max` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Remaining share of `max`, in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// Subtract `amount`, flooring at 0.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() || !(amount > 0.0) {
            return DamageOutcome::Ignored;
        }
        let dealt = amount.min(self.current);
        self.current -= dealt;
        if self.current <= 0.0 {
            self.current = 0.0;
            DamageOutcome::Killed { dealt }
        } else {
            DamageOutcome::Wounded { dealt }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overkill_floors_at_zero() {
        let mut health = Health::new(50.0);
        let outcome = health.apply_damage(80.0);
        assert_eq!(outcome, DamageOutcome::Killed { dealt: 50.0 });
        assert_eq!(health.current(), 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn negative_and_nan_damage_are_ignored() {
        let mut health = Health::new(100.0);
        assert_eq!(health.apply_damage(-5.0), DamageOutcome::Ignored);
        assert_eq!(health.apply_damage(f32::NAN), DamageOutcome::Ignored);
        assert_eq!(health.current(), 100.0);
    }

    #[test]
    fn dead_agents_take_no_further_damage() {
        let mut health = Health::new(10.0);
        health.apply_damage(10.0);
        assert_eq!(health.apply_damage(5.0), DamageOutcome::Ignored);
        assert_eq!(health.current(), 0.0);
        assert_eq!(health.fraction(), 0.0);
    }

    #[test]
    fn health_stays_within_bounds_for_any_sequence() {
        let mut health = Health::new(100.0);
        for amount in [0.0, 12.5, -3.0, 1e9, 7.0] {
            health.apply_damage(amount);
            assert!(health.current() >= 0.0 && health.current() <= health.max());
        }
    }
}
