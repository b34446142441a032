//! Diesel schema for report schedule persistence.

diesel::table! {
    /// Per-user report schedules; `owner` carries a unique index.
    task_reports (id) {
        /// Store-assigned schedule identifier.
        id -> BigInt,
        /// Owning user identifier, at most one row per owner.
        #[max_length = 150]
        owner -> Varchar,
        /// Recipient email address.
        #[max_length = 254]
        user_mail -> Varchar,
        /// Local wall-clock fire time.
        report_time -> Time,
        /// IANA timezone name the fire time is expressed in.
        #[max_length = 64]
        timezone -> Varchar,
        /// Next UTC instant the report fires.
        next_run_at -> Timestamptz,
        /// Whether the schedule participates in dispatch.
        enabled -> Bool,
    }
}
