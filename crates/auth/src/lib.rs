pub mod authorize;
pub mod permissions;
pub mod profile;
pub mod roles;
pub mod session;
pub mod storage;

pub use authorize::{AuthzError, Decision, Reason, authorize_module, capability_matrix, explain};
pub use permissions::{
    Action, ActionGrants, Module, ModuleGrant, PERMISSION_GROUPS, PermissionEntry, PermissionGroup,
    PermissionSet, has_action, has_module,
};
pub use profile::Profile;
pub use roles::Role;
pub use session::{AdminIdentity, AuthContext, IDENTITY_KEY};
pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError};
