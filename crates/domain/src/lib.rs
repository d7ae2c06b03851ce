// Claimstate - Domain Layer
// Bounded contexts:
// - shared_kernel: Names, errors and the shared Result alias
// - nodeclaim: NodeClaim aggregate, spec sub-structures and validation
// - schema: Declarative constraint rules mirrored at the store's write boundary
// - stores: Ports for the authoritative resource store and the cluster-state cache

pub mod nodeclaim;
pub mod schema;
pub mod shared_kernel;
pub mod stores;

pub use nodeclaim::*;
pub use shared_kernel::*;
pub use stores::*;
