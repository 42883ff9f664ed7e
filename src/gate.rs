// ABOUTME: Fixed pool of exclusive-occupancy gates with first-fit allocation.
// ABOUTME: Occupy/release are state-checked; allocation order is decided by the tower.

use std::sync::Mutex;

use crate::error::GateError;
use crate::plane::PlaneId;

/// Point-in-time occupancy of a single gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStatus {
    /// Gate number, starting at 1.
    pub number: u32,
    pub occupant: Option<PlaneId>,
}

/// Fixed set of gates, numbered from 1.
///
/// The pool enforces the occupancy contract only: occupying an occupied gate
/// or releasing an empty one is a state conflict. Fairness between planes is
/// the tower's concern, not the pool's.
pub struct GatePool {
    slots: Mutex<Vec<Option<PlaneId>>>,
}

impl GatePool {
    pub fn new(count: u32) -> Self {
        Self {
            slots: Mutex::new(vec![None; count as usize]),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First unoccupied gate, lowest number first.
    pub fn find_available(&self) -> Option<u32> {
        let slots = self.slots.lock().unwrap();
        slots
            .iter()
            .position(Option::is_none)
            .map(|idx| idx as u32 + 1)
    }

    /// Mark a gate occupied by `plane`.
    pub fn occupy(&self, number: u32, plane: PlaneId) -> Result<(), GateError> {
        let mut slots = self.slots.lock().unwrap();
        let slot = Self::slot(&mut slots, number)?;
        if let Some(occupant) = *slot {
            return Err(GateError::AlreadyOccupied {
                gate: number,
                occupant,
            });
        }
        *slot = Some(plane);
        Ok(())
    }

    /// Mark a gate empty again.
    pub fn release(&self, number: u32) -> Result<(), GateError> {
        let mut slots = self.slots.lock().unwrap();
        let slot = Self::slot(&mut slots, number)?;
        if slot.is_none() {
            return Err(GateError::Vacant { gate: number });
        }
        *slot = None;
        Ok(())
    }

    pub fn occupant_of(&self, number: u32) -> Option<PlaneId> {
        let idx = (number as usize).checked_sub(1)?;
        let slots = self.slots.lock().unwrap();
        slots.get(idx).copied().flatten()
    }

    /// The gate `plane` currently occupies, if any.
    pub fn gate_of(&self, plane: PlaneId) -> Option<u32> {
        let slots = self.slots.lock().unwrap();
        slots
            .iter()
            .position(|slot| *slot == Some(plane))
            .map(|idx| idx as u32 + 1)
    }

    /// Occupancy snapshot for the status report.
    pub fn snapshot(&self) -> Vec<GateStatus> {
        let slots = self.slots.lock().unwrap();
        slots
            .iter()
            .enumerate()
            .map(|(idx, occupant)| GateStatus {
                number: idx as u32 + 1,
                occupant: *occupant,
            })
            .collect()
    }

    fn slot(slots: &mut [Option<PlaneId>], number: u32) -> Result<&mut Option<PlaneId>, GateError> {
        if number == 0 {
            return Err(GateError::Unknown { gate: number });
        }
        slots
            .get_mut(number as usize - 1)
            .ok_or(GateError::Unknown { gate: number })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fit_lowest_number() {
        let pool = GatePool::new(3);
        assert_eq!(pool.find_available(), Some(1));

        pool.occupy(1, PlaneId(1)).unwrap();
        assert_eq!(pool.find_available(), Some(2));

        pool.occupy(2, PlaneId(2)).unwrap();
        pool.release(1).unwrap();
        // Gate 1 freed up, so it is offered again before gate 3.
        assert_eq!(pool.find_available(), Some(1));
    }

    #[test]
    fn test_occupy_occupied_gate_is_conflict() {
        let pool = GatePool::new(2);
        pool.occupy(1, PlaneId(1)).unwrap();

        let err = pool.occupy(1, PlaneId(2)).unwrap_err();
        match err {
            GateError::AlreadyOccupied { gate, occupant } => {
                assert_eq!(gate, 1);
                assert_eq!(occupant, PlaneId(1));
            }
            other => panic!("Expected AlreadyOccupied, got {:?}", other),
        }
    }

    #[test]
    fn test_release_empty_gate_is_conflict() {
        let pool = GatePool::new(2);
        let err = pool.release(2).unwrap_err();
        match err {
            GateError::Vacant { gate } => assert_eq!(gate, 2),
            other => panic!("Expected Vacant, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_gate_rejected() {
        let pool = GatePool::new(2);
        assert!(matches!(
            pool.occupy(3, PlaneId(1)),
            Err(GateError::Unknown { gate: 3 })
        ));
        assert!(matches!(
            pool.occupy(0, PlaneId(1)),
            Err(GateError::Unknown { gate: 0 })
        ));
    }

    #[test]
    fn test_gate_of_and_snapshot() {
        let pool = GatePool::new(3);
        pool.occupy(2, PlaneId(4)).unwrap();

        assert_eq!(pool.gate_of(PlaneId(4)), Some(2));
        assert_eq!(pool.gate_of(PlaneId(1)), None);
        assert_eq!(pool.occupant_of(2), Some(PlaneId(4)));

        let snapshot = pool.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[1].occupant, Some(PlaneId(4)));
        assert_eq!(snapshot[0].occupant, None);
    }

    #[test]
    fn test_pool_exhaustion() {
        let pool = GatePool::new(1);
        pool.occupy(1, PlaneId(1)).unwrap();
        assert_eq!(pool.find_available(), None);
    }
}
