use crate::domain::model::{DayDishes, DayEntry, OrderDay, OrderDayDish, SkipType};
use crate::utils::error::{PlannerError, Result};

/// Pairs expanded calendar entries with meal-plan slots.
///
/// Slot `i` belongs to entry `i`. Skipped entries use up their slot without
/// receiving dishes and are tagged as weekday skips. Within a delivery day
/// the primary choice of each dish type starts out selected.
pub fn build_order_days(entries: &[DayEntry], plan: &[DayDishes]) -> Result<Vec<OrderDay>> {
    if plan.len() < entries.len() {
        return Err(PlannerError::MealPlanMismatch {
            expected: entries.len(),
            actual: plan.len(),
        });
    }

    let days = entries
        .iter()
        .zip(plan)
        .enumerate()
        .map(|(index, (entry, slot))| {
            let dishes = if entry.is_skipped {
                Vec::new()
            } else {
                slot.dishes
                    .iter()
                    .map(|choice| OrderDayDish {
                        dish_type_id: choice.dish_type_id,
                        dish_id: choice.dish_id,
                        is_selected: choice.is_primary,
                    })
                    .collect()
            };

            OrderDay {
                id: index as u64 + 1,
                date: entry.date,
                is_skipped: entry.is_skipped,
                skip_type: entry.is_skipped.then_some(SkipType::WeekdaySkipped),
                dishes,
            }
        })
        .collect();

    Ok(days)
}

/// Makes `dish_id` the selected dish of its type for `day`.
pub fn select_dish(day: &mut OrderDay, dish_type_id: u64, dish_id: u64) -> Result<OrderDayDish> {
    let position = day
        .dishes
        .iter()
        .position(|dish| dish.dish_type_id == dish_type_id && dish.dish_id == dish_id)
        .ok_or(PlannerError::NotFound {
            entity: "Dish",
            id: dish_id,
        })?;

    if !day.dishes[position].is_selected {
        for dish in day
            .dishes
            .iter_mut()
            .filter(|dish| dish.dish_type_id == dish_type_id)
        {
            dish.is_selected = dish.dish_id == dish_id;
        }
    }

    Ok(day.dishes[position].clone())
}

/// Dishes of `dish_type_id` that could replace the current selection.
pub fn replacement_dishes(day: &OrderDay, dish_type_id: u64) -> Vec<&OrderDayDish> {
    day.dishes
        .iter()
        .filter(|dish| dish.dish_type_id == dish_type_id && !dish.is_selected)
        .collect()
}

/// Selected dishes of a day, ordered by dish type.
pub fn selected_dishes(day: &OrderDay) -> Vec<&OrderDayDish> {
    let mut selected: Vec<&OrderDayDish> = day.dishes.iter().filter(|dish| dish.is_selected).collect();
    selected.sort_by_key(|dish| dish.dish_type_id);
    selected
}
