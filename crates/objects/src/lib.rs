pub mod model;
pub mod props;
pub mod registry;
pub mod transformers;
pub mod xml;

pub use model::{
    Address, CyboxObject, DomainName, EmailMessage, FileHash, FileObject, HttpSession,
    NetworkConnection, Observable, RelatedObject,
};
pub use registry::{ObjectTransformer, Transformed, TransformerRegistry};
