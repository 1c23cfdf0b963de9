//! Quick-add presets
//!
//! One-tap drink templates: a fixed set of built-ins plus user-defined
//! presets stored in the `quick_adds` table.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::analysis::derive_alcohol_grams;
use crate::db::DbResult;

/// A built-in preset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BuiltinQuickAdd {
    pub key: &'static str,
    pub label: &'static str,
    pub drink_type: &'static str,
    pub volume_ml: f64,
    pub abv_percent: f64,
}

pub const BUILTIN_QUICK_ADDS: &[BuiltinQuickAdd] = &[
    BuiltinQuickAdd {
        key: "pint_of_beer",
        label: "Pint of Beer",
        drink_type: "beer",
        volume_ml: 568.0,
        abv_percent: 4.5,
    },
    BuiltinQuickAdd {
        key: "large_wine",
        label: "Large Wine",
        drink_type: "wine",
        volume_ml: 175.0,
        abv_percent: 13.0,
    },
    BuiltinQuickAdd {
        key: "shot",
        label: "Shot",
        drink_type: "spirit",
        volume_ml: 25.0,
        abv_percent: 40.0,
    },
];

impl BuiltinQuickAdd {
    pub fn find(key: &str) -> Option<&'static BuiltinQuickAdd> {
        let wanted = key.trim().to_lowercase().replace([' ', '-'], "_");
        BUILTIN_QUICK_ADDS.iter().find(|q| q.key == wanted)
    }

    pub fn alcohol_grams(&self) -> f64 {
        derive_alcohol_grams(self.volume_ml, self.abv_percent)
    }
}

/// A user-defined preset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomQuickAdd {
    pub id: i64,
    pub label: String,
    pub drink_type: String,
    pub volume_ml: f64,
    pub abv_percent: f64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomQuickAddCreate {
    pub label: String,
    pub drink_type: String,
    pub volume_ml: f64,
    pub abv_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomQuickAddUpdate {
    pub label: Option<String>,
    pub drink_type: Option<String>,
    pub volume_ml: Option<f64>,
    pub abv_percent: Option<f64>,
}

impl CustomQuickAdd {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            label: row.get("label")?,
            drink_type: row.get("drink_type")?,
            volume_ml: row.get("volume_ml")?,
            abv_percent: row.get("abv_percent")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &CustomQuickAddCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO quick_adds (label, drink_type, volume_ml, abv_percent) VALUES (?1, ?2, ?3, ?4)",
            params![data.label, data.drink_type, data.volume_ml, data.abv_percent],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM quick_adds WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(q) => Ok(Some(q)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM quick_adds ORDER BY label COLLATE NOCASE, id")?;
        let items = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    pub fn update(conn: &Connection, id: i64, data: &CustomQuickAddUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref label) = data.label {
            updates.push(format!("label = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(label.clone()));
        }
        if let Some(ref drink_type) = data.drink_type {
            updates.push(format!("drink_type = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(drink_type.clone()));
        }
        if let Some(volume) = data.volume_ml {
            updates.push(format!("volume_ml = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(volume));
        }
        if let Some(abv) = data.abv_percent {
            updates.push(format!("abv_percent = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(abv));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE quick_adds SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM quick_adds WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    pub fn alcohol_grams(&self) -> f64 {
        derive_alcohol_grams(self.volume_ml, self.abv_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_builtin_lookup() {
        let pint = BuiltinQuickAdd::find("Pint of Beer").unwrap();
        assert_eq!(pint.volume_ml, 568.0);
        assert!((pint.alcohol_grams() - 20.16684).abs() < 1e-6);
        assert!(BuiltinQuickAdd::find("shot").is_some());
        assert!(BuiltinQuickAdd::find("magnum").is_none());
    }

    #[test]
    fn test_custom_crud() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let created = CustomQuickAdd::create(
            &conn,
            &CustomQuickAddCreate {
                label: "Craft IPA".to_string(),
                drink_type: "beer".to_string(),
                volume_ml: 440.0,
                abv_percent: 6.5,
            },
        )
        .unwrap();

        let updated = CustomQuickAdd::update(
            &conn,
            created.id,
            &CustomQuickAddUpdate {
                abv_percent: Some(7.2),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.abv_percent, 7.2);
        assert_eq!(updated.label, "Craft IPA");

        assert_eq!(CustomQuickAdd::list(&conn).unwrap().len(), 1);
        assert!(CustomQuickAdd::delete(&conn, created.id).unwrap());
        assert!(CustomQuickAdd::get_by_id(&conn, created.id).unwrap().is_none());
    }
}
