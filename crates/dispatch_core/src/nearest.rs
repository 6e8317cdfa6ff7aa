use crate::{Dispatcher, Location};

/// Closest dispatcher to `target` and its distance.
///
/// Dispatchers are scanned in order and only a strictly smaller distance
/// replaces the current best, so ties go to the earliest dispatcher.
pub(crate) fn nearest_dispatcher<'a>(
    dispatchers: &'a [Dispatcher],
    target: &Location,
) -> Option<(&'a Dispatcher, u64)> {
    let mut best: Option<(&Dispatcher, u64)> = None;
    for dispatcher in dispatchers {
        let distance = dispatcher.location.distance_to(target);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((dispatcher, distance)),
        }
    }
    best
}

#[cfg(test)]
mod test_nearest_dispatcher {
    use super::*;

    fn dispatcher(id: i32, x: i32, y: i32) -> Dispatcher {
        Dispatcher {
            id,
            location: Location::new(x, y),
        }
    }

    #[test]
    /// No dispatcher to pick from
    fn test_empty() {
        assert!(nearest_dispatcher(&[], &Location::new(0, 0)).is_none());
    }

    #[test]
    /// Distances 5, 3, 3, 7: the first dispatcher at distance 3 wins
    fn test_tie_goes_to_earliest() {
        let dispatchers = vec![
            dispatcher(10, 5, 0),
            dispatcher(11, 0, 3),
            dispatcher(12, 3, 0),
            dispatcher(13, 7, 0),
        ];
        let (chosen, distance) =
            nearest_dispatcher(&dispatchers, &Location::new(0, 0)).expect("a dispatcher");
        assert_eq!(chosen.id, 11);
        assert_eq!(distance, 3);
    }

    #[test]
    /// The closest dispatcher is last in the list
    fn test_closest_last() {
        let dispatchers = vec![dispatcher(1, 9, 9), dispatcher(2, -4, 4), dispatcher(3, 2, 2)];
        let (chosen, distance) =
            nearest_dispatcher(&dispatchers, &Location::new(3, 3)).expect("a dispatcher");
        assert_eq!(chosen.id, 3);
        assert_eq!(distance, 2);
    }

    #[test]
    /// A dispatcher standing on the incident has distance zero
    fn test_same_cell() {
        let dispatchers = vec![dispatcher(1, 1, 1), dispatcher(2, -2, 5)];
        let (chosen, distance) =
            nearest_dispatcher(&dispatchers, &Location::new(-2, 5)).expect("a dispatcher");
        assert_eq!(chosen.id, 2);
        assert_eq!(distance, 0);
    }
}
