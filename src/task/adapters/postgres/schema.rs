//! Diesel schema for task and history persistence.

diesel::table! {
    /// Task records, soft-deleted rather than removed.
    tasks (id) {
        /// Store-assigned task identifier.
        id -> BigInt,
        /// Owning user identifier.
        #[max_length = 150]
        owner -> Varchar,
        /// Normalized task title.
        #[max_length = 100]
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Priority within the owner's live task set.
        priority -> BigInt,
        /// Workflow status.
        #[max_length = 100]
        status -> Varchar,
        /// Completion flag, independent of status.
        completed -> Bool,
        /// Soft-delete flag.
        deleted -> Bool,
        /// Creation timestamp, immutable once set.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only status transition records.
    task_histories (id) {
        /// Store-assigned history identifier.
        id -> BigInt,
        /// Task the transition belongs to.
        task_id -> BigInt,
        /// Status before the transition.
        #[max_length = 100]
        old_status -> Varchar,
        /// Status after the transition.
        #[max_length = 100]
        new_status -> Varchar,
        /// When the transition was recorded.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(task_histories -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_histories);
