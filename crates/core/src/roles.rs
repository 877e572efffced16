//! Role names and the capabilities they resolve to.
//!
//! Authorization decisions are made against a [`CapabilitySet`] resolved
//! once per authenticated session, never against raw role strings scattered
//! through handlers. The role names must match the `role` column values
//! seeded in `20260801000003_create_profiles.sql`.

pub const ROLE_DIRIGENTE: &str = "dirigente";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPERADMIN: &str = "superadmin";

/// A single permission the platform distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Capability {
    /// Read the aggregate dashboard and its realtime feed.
    ViewDashboard = 1 << 0,
    /// Register mobilized voters.
    RegisterVoters = 1 << 1,
    /// Create, edit, delete, and bulk-import vehicles.
    ManageFleet = 1 << 2,
    /// Create, edit, and delete dirigente profiles.
    ManageStaff = 1 << 3,
    /// Query the AI assistant.
    UseAssistant = 1 << 4,
    /// Change the status of a vehicle assigned to the caller.
    UpdateAssignedVehicle = 1 << 5,
    /// Cross-organization administration (reserved for superadmin).
    ManageOrganizations = 1 << 6,
}

/// The set of capabilities granted to a session.
///
/// Cheap to copy; resolved from the role name at token validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet(u16);

impl CapabilitySet {
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    pub fn contains(self, cap: Capability) -> bool {
        self.0 & (cap as u16) != 0
    }

    pub fn with(self, cap: Capability) -> Self {
        CapabilitySet(self.0 | cap as u16)
    }
}

/// Resolve a role name into its capability set.
///
/// Unknown role names resolve to the empty set, so a forged or stale role
/// claim grants nothing.
pub fn capabilities_for_role(role: &str) -> CapabilitySet {
    match role {
        ROLE_DIRIGENTE => CapabilitySet::EMPTY
            .with(Capability::RegisterVoters)
            .with(Capability::UpdateAssignedVehicle),
        ROLE_ADMIN => CapabilitySet::EMPTY
            .with(Capability::ViewDashboard)
            .with(Capability::ManageFleet)
            .with(Capability::ManageStaff)
            .with(Capability::UseAssistant)
            .with(Capability::UpdateAssignedVehicle),
        ROLE_SUPERADMIN => capabilities_for_role(ROLE_ADMIN).with(Capability::ManageOrganizations),
        _ => CapabilitySet::EMPTY,
    }
}
