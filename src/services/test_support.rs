//! Fixtures shared by service tests

use chrono::NaiveDate;

use crate::models::{
    equipment::Equipment,
    maintenance::{EventDetails, MaintenanceEvent, MaintenanceScheduleEntry},
    EquipmentStatus, LocationKind, MaintenanceKind, MaintenanceType,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn equipment(id: i32, status: EquipmentStatus) -> Equipment {
    Equipment {
        id,
        name: format!("Compressor {}", id),
        internal_code: Some(format!("EQ-{:04}", id)),
        description: None,
        location_kind: LocationKind::Area,
        area_id: Some(1),
        workstation_id: None,
        responsible_name: Some("Plant lead".to_string()),
        responsible_document: None,
        status,
        crea_date: None,
        modif_date: None,
    }
}

pub fn schedule(
    id: i32,
    equipment_id: i32,
    interval_days: i32,
    anchor: Option<NaiveDate>,
) -> MaintenanceScheduleEntry {
    MaintenanceScheduleEntry {
        id,
        equipment_id,
        maintenance_type: MaintenanceType::Inspection,
        interval_days,
        anchor_date: anchor,
        due_date: anchor.map(|a| a + chrono::Days::new(interval_days as u64)),
        active: true,
        label: None,
        version: 3,
        crea_date: None,
        modif_date: None,
    }
}

pub fn details(performed_date: NaiveDate) -> EventDetails {
    EventDetails {
        performed_date,
        performed_by: "jdoe".to_string(),
        description: Some("Routine check".to_string()),
        notes: None,
    }
}

pub fn event(
    id: i32,
    equipment_id: i32,
    schedule_id: Option<i32>,
    kind: MaintenanceKind,
    performed_date: NaiveDate,
) -> MaintenanceEvent {
    MaintenanceEvent {
        id,
        equipment_id,
        schedule_id,
        kind,
        performed_date,
        performed_by: "jdoe".to_string(),
        description: None,
        notes: None,
        crea_date: None,
    }
}
