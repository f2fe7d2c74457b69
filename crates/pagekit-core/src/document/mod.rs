//! The editable site configuration document.
//!
//! # Shape of the data (for beginners)
//!
//! The document is a tree.  Every *branch* is a mapping from field names to
//! child nodes, and every *leaf* is a string:
//!
//! ```text
//! root
//! ├── siteName        = "Meus Descontos Online"
//! ├── heroTitle       = "..."
//! └── affiliateLinks
//!     ├── amazon      = "#amazon-afiliado"
//!     └── shopee      = "#shopee-afiliado"
//! ```
//!
//! A leaf is addressed by a [`path::FieldPath`], written with dots:
//! `affiliateLinks.amazon`.  Arrays never appear in the tree.
//!
//! # Immutability by replacement
//!
//! [`node::ConfigDocument::set`] never touches the document it is called on.
//! It returns a new document in which only the ancestors of the written leaf
//! were copied; every other branch is the *same* `Arc` as before.  A reader
//! holding the old document therefore never sees a half-applied write.

pub mod defaults;
pub mod node;
pub mod path;
