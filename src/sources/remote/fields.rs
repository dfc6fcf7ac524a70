//! Static selection sets used by the remote source.

macro_rules! generic_metadata_fields {
    () => {
        "path\nname\nprefix\ndisplayName\ndescription"
    };
}

macro_rules! impl_revision_fields {
    () => {
        concat!(
            "revision\n",
            "metadata {\n",
            generic_metadata_fields!(),
            "\nattributes {\nmetadata {\npath\n}\nrevision\n}\n}\n",
            "spec {\nappVersion\n",
            "implements {\npath\nrevision\n}\n",
            "requires {\nprefix\n",
            "oneOf {\ntypeRef {\npath\nrevision\n}\nalias\n}\n",
            "anyOf {\ntypeRef {\npath\nrevision\n}\nalias\n}\n",
            "allOf {\ntypeRef {\npath\nrevision\n}\nalias\n}\n",
            "}\n}"
        )
    };
}

/// Root fields of an Interface.
pub const INTERFACE_FIELDS: &str = "path\nname\nprefix";

/// Fields of an Interface revision, without its Implementations.
pub const IFACE_REVISION_FIELDS: &str = concat!(
    "revision\nmetadata {\n",
    generic_metadata_fields!(),
    "\n}"
);

/// Fields of an Implementation revision.
pub const IMPL_REVISION_FIELDS: &str = impl_revision_fields!();

/// Fields of an Interface revision including every Implementation revision.
pub const IFACE_REVISION_ALL_FIELDS: &str = concat!(
    "revision\nmetadata {\n",
    generic_metadata_fields!(),
    "\n}\nimplementationRevisions {\n",
    impl_revision_fields!(),
    "\n}"
);

/// Fields of a Type revision needed to read its JSON schema.
pub const TYPE_REVISION_SCHEMA_FIELDS: &str = "revision\nmetadata {\npath\n}\nspec {\njsonSchema\n}";
