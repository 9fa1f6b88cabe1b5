use crate::domain::model::DayDishes;
use crate::domain::ports::MealPlanProvider;
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Rotation of daily dish sets, repeated for as long as the order runs.
    pub days: Vec<DayDishes>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCatalog {
    pub menus: Vec<Menu>,
}

impl MenuCatalog {
    pub fn new(menus: Vec<Menu>) -> Self {
        Self { menus }
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read(path.as_ref()).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    pub fn menu(&self, id: u64) -> Option<&Menu> {
        self.menus.iter().find(|menu| menu.id == id)
    }
}

#[async_trait]
impl MealPlanProvider for MenuCatalog {
    async fn meal_plan(&self, menu_id: u64, start: NaiveDate, day_count: usize) -> Result<Vec<DayDishes>> {
        let menu = self.menu(menu_id).ok_or(PlannerError::NotFound {
            entity: "Menu",
            id: menu_id,
        })?;

        if menu.days.is_empty() && day_count > 0 {
            return Err(PlannerError::MealPlanMismatch {
                expected: day_count,
                actual: 0,
            });
        }

        tracing::debug!(
            "meal plan for menu {} from {}: {} days from a {}-day rotation",
            menu_id,
            start,
            day_count,
            menu.days.len()
        );

        Ok(menu.days.iter().cycle().take(day_count).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DishChoice;

    fn catalog() -> MenuCatalog {
        let day = |dish_id| DayDishes {
            dishes: vec![DishChoice {
                dish_type_id: 1,
                dish_id,
                is_primary: true,
            }],
        };
        MenuCatalog::new(vec![
            Menu {
                id: 1,
                name: "Balance".to_string(),
                days: vec![day(10), day(11)],
            },
            Menu {
                id: 2,
                name: "Empty".to_string(),
                days: Vec::new(),
            },
        ])
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[tokio::test]
    async fn test_meal_plan_cycles_menu_days() {
        let plan = catalog().meal_plan(1, start(), 5).await.unwrap();
        let ids: Vec<u64> = plan.iter().map(|d| d.dishes[0].dish_id).collect();
        assert_eq!(ids, vec![10, 11, 10, 11, 10]);
    }

    #[tokio::test]
    async fn test_meal_plan_unknown_menu() {
        assert!(matches!(
            catalog().meal_plan(9, start(), 1).await,
            Err(PlannerError::NotFound { entity: "Menu", id: 9 })
        ));
    }

    #[tokio::test]
    async fn test_meal_plan_empty_menu() {
        assert!(catalog().meal_plan(2, start(), 0).await.unwrap().is_empty());
        assert!(catalog().meal_plan(2, start(), 3).await.is_err());
    }
}
