//! The on-screen crew portrait roster and its reconciliation with seat occupancy.

use crate::host::{FlightState, InteriorModels};
use engine_core::{CrewId, PartId, VesselId};

/// Crew currently shown as portraits. Process-wide; outlives any compartment.
///
/// Membership is by identity and a crew member is never listed twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrewRoster {
    members: Vec<CrewId>,
}

impl CrewRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members in the order they were added.
    pub fn members(&self) -> &[CrewId] {
        &self.members
    }

    pub fn contains(&self, crew: CrewId) -> bool {
        self.members.contains(&crew)
    }

    /// Returns false if already listed.
    pub fn add(&mut self, crew: CrewId) -> bool {
        if self.contains(crew) {
            return false;
        }
        self.members.push(crew);
        true
    }

    /// Returns false if not listed.
    pub fn remove(&mut self, crew: CrewId) -> bool {
        match self.members.iter().position(|&c| c == crew) {
            Some(i) => {
                self.members.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Keeps the roster equal to the crew seated in the active vessel.
///
/// Within one frame every compartment of the active vessel must finish
/// [`remove_stowaways`](Self::remove_stowaways) before any of them runs
/// [`add_missing`](Self::add_missing).
#[derive(Debug, Clone, Copy)]
pub struct CrewRosterSynchronizer {
    active_vessel: VesselId,
}

impl CrewRosterSynchronizer {
    pub fn new(active_vessel: VesselId) -> Self {
        Self { active_vessel }
    }

    /// Drop every member who is not aboard the active vessel. Returns who was dropped.
    pub fn remove_stowaways<H: FlightState + ?Sized>(&self, roster: &mut CrewRoster, host: &H) -> Vec<CrewId> {
        let stowaways: Vec<CrewId> = roster
            .members()
            .iter()
            .copied()
            .filter(|&crew| host.crew_vessel(crew) != Some(self.active_vessel))
            .collect();
        for &crew in &stowaways {
            roster.remove(crew);
        }
        if !stowaways.is_empty() {
            log::debug!("Removed {} portraits from outside {}", stowaways.len(), self.active_vessel);
        }
        stowaways
    }

    /// Add every occupant of `part`'s seats who is not listed yet. Returns who was added.
    pub fn add_missing<H: InteriorModels + ?Sized>(&self, roster: &mut CrewRoster, host: &H, part: PartId) -> Vec<CrewId> {
        host.seat_occupants(part)
            .into_iter()
            .flatten()
            .filter(|&crew| roster.add(crew))
            .collect()
    }

    /// Both passes for a single compartment.
    pub fn synchronize<H: FlightState + InteriorModels + ?Sized>(&self, roster: &mut CrewRoster, host: &H, part: PartId) {
        self.remove_stowaways(roster, host);
        self.add_missing(roster, host, part);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimHost;
    use engine_core::Vec3;

    #[test]
    fn roster_rejects_duplicates() {
        let mut roster = CrewRoster::new();
        assert!(roster.add(CrewId(1)));
        assert!(!roster.add(CrewId(1)));
        assert_eq!(roster.len(), 1);
        assert!(roster.remove(CrewId(1)));
        assert!(!roster.remove(CrewId(1)));
        assert!(roster.is_empty());
    }

    #[test]
    fn stowaways_are_removed_and_seated_crew_added() {
        let mut host = SimHost::new();
        let ours = host.add_vessel();
        let theirs = host.add_vessel();
        let pod = host.add_part(ours, Vec3::ZERO, 2, &[]);
        let other = host.add_part(theirs, Vec3::ZERO, 1, &[]);
        let pilot = host.add_crew(pod, 0).unwrap();
        let visitor = host.add_crew(other, 0).unwrap();
        host.spawn_crew(pod).unwrap();

        let mut roster = CrewRoster::new();
        roster.add(visitor);
        roster.add(pilot);

        let sync = CrewRosterSynchronizer::new(ours);
        assert_eq!(sync.remove_stowaways(&mut roster, &host), vec![visitor]);
        assert!(sync.add_missing(&mut roster, &host, pod).is_empty());
        assert_eq!(roster.members(), &[pilot]);
    }

    #[test]
    fn several_stowaways_removed_in_one_pass() {
        let mut host = SimHost::new();
        let ours = host.add_vessel();
        let theirs = host.add_vessel();
        host.add_part(ours, Vec3::ZERO, 1, &[]);
        let other = host.add_part(theirs, Vec3::ZERO, 3, &[]);
        let mut roster = CrewRoster::new();
        for seat in 0..3 {
            roster.add(host.add_crew(other, seat).unwrap());
        }
        let sync = CrewRosterSynchronizer::new(ours);
        assert_eq!(sync.remove_stowaways(&mut roster, &host).len(), 3);
        assert!(roster.is_empty());
    }

    #[test]
    fn synchronize_is_idempotent() {
        let mut host = SimHost::new();
        let v = host.add_vessel();
        let pod = host.add_part(v, Vec3::ZERO, 2, &[]);
        let a = host.add_crew(pod, 0).unwrap();
        let b = host.add_crew(pod, 1).unwrap();
        host.spawn_crew(pod).unwrap();

        let mut roster = CrewRoster::new();
        let sync = CrewRosterSynchronizer::new(v);
        sync.synchronize(&mut roster, &host, pod);
        let once = roster.clone();
        sync.synchronize(&mut roster, &host, pod);
        assert_eq!(roster, once);
        assert_eq!(roster.members(), &[a, b]);
    }
}
