//! Nearest-neighbour route ordering

use super::Route;
use crate::fleet::geometry::distance;
use crate::fleet::types::{Point, Task};

/// Repeatedly take the task whose pickup is closest to the current
/// position. Distance ties go to the lower task id.
pub fn order(tasks: &[Task], start: Point) -> Route {
    let mut remaining: Vec<&Task> = tasks.iter().collect();
    let mut order = Vec::with_capacity(tasks.len());
    let mut current = start;

    while !remaining.is_empty() {
        let Some((next, _)) = remaining.iter().enumerate().min_by(|(_, a), (_, b)| {
            distance(current, a.pickup())
                .total_cmp(&distance(current, b.pickup()))
                .then(a.id().cmp(&b.id()))
        }) else {
            break;
        };
        let task = remaining.swap_remove(next);
        current = task.dropoff();
        order.push(task.clone());
    }

    Route::from_order(start, order)
}
