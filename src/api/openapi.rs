//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{decommissions, equipment, health, maintenance, schedules};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Assetlog API",
        version = "1.0.0",
        description = "Equipment maintenance scheduling REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::maintenance_status,
        // Schedules
        schedules::list_schedules,
        schedules::attach_schedule,
        schedules::detach_all,
        schedules::update_schedule,
        schedules::deactivate_schedule,
        schedules::detach_schedule,
        // Maintenance log
        maintenance::record_preventive,
        maintenance::record_corrective,
        maintenance::list_events,
        maintenance::list_due,
        // Decommissions
        decommissions::decommission_equipment,
        decommissions::get_decommission,
        decommissions::list_decommissions,
    ),
    components(
        schemas(
            // Enums
            crate::models::Urgency,
            crate::models::EquipmentStatus,
            crate::models::LocationKind,
            crate::models::MaintenanceType,
            crate::models::MaintenanceKind,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentWithUrgency,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::RegisteredEquipment,
            // Schedules
            crate::models::maintenance::MaintenanceScheduleEntry,
            crate::models::maintenance::AttachSchedule,
            crate::models::maintenance::UpdateSchedule,
            crate::models::maintenance::ScheduleStatus,
            crate::models::maintenance::EquipmentMaintenanceStatus,
            schedules::DetachedResponse,
            // Maintenance log
            crate::models::maintenance::MaintenanceEvent,
            crate::models::maintenance::RecordPreventive,
            crate::models::maintenance::RecordCorrective,
            crate::models::maintenance::PreventiveRecorded,
            crate::models::maintenance::DueMaintenance,
            // Decommissions
            crate::models::decommission::DecommissionRecord,
            crate::models::decommission::DecommissionRequest,
            crate::models::decommission::DecommissionedEquipment,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "equipment", description = "Equipment registry and maintenance status"),
        (name = "schedules", description = "Maintenance schedules"),
        (name = "maintenance", description = "Maintenance log and due listing"),
        (name = "decommissions", description = "Equipment decommissioning")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
