//! Identifiers of well-known markers.

/// `+optional`
pub const OPTIONAL: &str = "optional";
/// `+required`
pub const REQUIRED: &str = "required";
/// `+kubebuilder:validation:Optional`
pub const KUBEBUILDER_OPTIONAL: &str = "kubebuilder:validation:Optional";
/// `+kubebuilder:validation:Required`
pub const KUBEBUILDER_REQUIRED: &str = "kubebuilder:validation:Required";
/// `+k8s:optional`
pub const K8S_OPTIONAL: &str = "k8s:optional";
/// `+k8s:required`
pub const K8S_REQUIRED: &str = "k8s:required";

/// Every recognized spelling of the optional marker.
pub const OPTIONAL_SPELLINGS: &[&str] = &[OPTIONAL, KUBEBUILDER_OPTIONAL, K8S_OPTIONAL];
/// Every recognized spelling of the required marker.
pub const REQUIRED_SPELLINGS: &[&str] = &[REQUIRED, KUBEBUILDER_REQUIRED, K8S_REQUIRED];

/// `+default:=value`
pub const DEFAULT: &str = "default";
/// `+kubebuilder:default:=value`
pub const KUBEBUILDER_DEFAULT: &str = "kubebuilder:default";
/// `+k8s:default=value`
pub const K8S_DEFAULT: &str = "k8s:default";

/// Every recognized spelling of the default marker.
pub const DEFAULT_SPELLINGS: &[&str] = &[DEFAULT, KUBEBUILDER_DEFAULT, K8S_DEFAULT];

/// `+kubebuilder:example=value`
pub const KUBEBUILDER_EXAMPLE: &str = "kubebuilder:example";

/// `+enum`
pub const ENUM: &str = "enum";
/// `+k8s:enum`
pub const K8S_ENUM: &str = "k8s:enum";
/// `+kubebuilder:validation:Enum=a;b;c`
pub const KUBEBUILDER_ENUM: &str = "kubebuilder:validation:Enum";

/// Every recognized spelling of the enum marker.
pub const ENUM_SPELLINGS: &[&str] = &[KUBEBUILDER_ENUM, K8S_ENUM, ENUM];

/// `+kubebuilder:validation:MinLength`
pub const MIN_LENGTH: &str = "kubebuilder:validation:MinLength";
/// `+kubebuilder:validation:MaxLength`
pub const MAX_LENGTH: &str = "kubebuilder:validation:MaxLength";
/// `+kubebuilder:validation:Pattern`
pub const PATTERN: &str = "kubebuilder:validation:Pattern";
/// `+kubebuilder:validation:Format`
pub const FORMAT: &str = "kubebuilder:validation:Format";
/// `+kubebuilder:validation:Minimum`
pub const MINIMUM: &str = "kubebuilder:validation:Minimum";
/// `+kubebuilder:validation:Maximum`
pub const MAXIMUM: &str = "kubebuilder:validation:Maximum";
/// `+kubebuilder:validation:ExclusiveMinimum`
pub const EXCLUSIVE_MINIMUM: &str = "kubebuilder:validation:ExclusiveMinimum";
/// `+kubebuilder:validation:ExclusiveMaximum`
pub const EXCLUSIVE_MAXIMUM: &str = "kubebuilder:validation:ExclusiveMaximum";
/// `+kubebuilder:validation:MultipleOf`
pub const MULTIPLE_OF: &str = "kubebuilder:validation:MultipleOf";
/// `+kubebuilder:validation:MinItems`
pub const MIN_ITEMS: &str = "kubebuilder:validation:MinItems";
/// `+kubebuilder:validation:MaxItems`
pub const MAX_ITEMS: &str = "kubebuilder:validation:MaxItems";
/// `+kubebuilder:validation:UniqueItems`
pub const UNIQUE_ITEMS: &str = "kubebuilder:validation:UniqueItems";
/// `+kubebuilder:validation:MinProperties`
pub const MIN_PROPERTIES: &str = "kubebuilder:validation:MinProperties";
/// `+kubebuilder:validation:MaxProperties`
pub const MAX_PROPERTIES: &str = "kubebuilder:validation:MaxProperties";
/// `+kubebuilder:validation:items:MaxLength`
pub const ITEMS_MAX_LENGTH: &str = "kubebuilder:validation:items:MaxLength";
/// `+kubebuilder:validation:items:MinLength`
pub const ITEMS_MIN_LENGTH: &str = "kubebuilder:validation:items:MinLength";
/// `+kubebuilder:validation:items:Enum`
pub const ITEMS_ENUM: &str = "kubebuilder:validation:items:Enum";
/// `+kubebuilder:validation:XValidation:rule=...,message=...`
pub const XVALIDATION: &str = "kubebuilder:validation:XValidation";
/// `+kubebuilder:validation:EmbeddedResource`
pub const EMBEDDED_RESOURCE: &str = "kubebuilder:validation:EmbeddedResource";
/// `+kubebuilder:pruning:PreserveUnknownFields`
pub const PRESERVE_UNKNOWN_FIELDS: &str = "kubebuilder:pruning:PreserveUnknownFields";
/// `+kubebuilder:validation:Type`
pub const SCHEMA_TYPE: &str = "kubebuilder:validation:Type";

/// `+nullable`
pub const NULLABLE: &str = "nullable";
/// `+kubebuilder:validation:Nullable`
pub const KUBEBUILDER_NULLABLE: &str = "kubebuilder:validation:Nullable";

/// `+listType=map`
pub const LIST_TYPE: &str = "listType";
/// `+listMapKey=type`
pub const LIST_MAP_KEY: &str = "listMapKey";
/// `+patchStrategy=merge`
pub const PATCH_STRATEGY: &str = "patchStrategy";
/// `+patchMergeKey=type`
pub const PATCH_MERGE_KEY: &str = "patchMergeKey";

/// `+kubebuilder:object:root=true`
pub const OBJECT_ROOT: &str = "kubebuilder:object:root";
/// `+kubebuilder:subresource:status`
pub const SUBRESOURCE_STATUS: &str = "kubebuilder:subresource:status";
/// `+kubebuilder:resource:scope=Namespaced`
pub const RESOURCE: &str = "kubebuilder:resource";
/// `+kubebuilder:printcolumn:name=...,type=...,JSONPath=...`
pub const PRINT_COLUMN: &str = "kubebuilder:printcolumn";
/// `+kubebuilder:subresource:scale:specpath=...`
pub const SUBRESOURCE_SCALE: &str = "kubebuilder:subresource:scale";
/// `+kubebuilder:storageversion`
pub const STORAGE_VERSION: &str = "kubebuilder:storageversion";

/// `+k8s:unionMember`
pub const K8S_UNION_MEMBER: &str = "k8s:unionMember";
/// `+k8s:unionDiscriminator`
pub const K8S_UNION_DISCRIMINATOR: &str = "k8s:unionDiscriminator";
/// `+unionDiscriminator`
pub const UNION_DISCRIMINATOR: &str = "unionDiscriminator";
