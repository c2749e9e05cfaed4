//! Diesel schema for task postings.

diesel::table! {
    /// Task postings owned by clients.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning client.
        client_id -> Uuid,
        /// Title.
        #[max_length = 255]
        title -> Varchar,
        /// Description.
        description -> Text,
        /// Budget, strictly positive.
        budget -> Float8,
        /// Deadline.
        deadline -> Timestamptz,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Optional category.
        #[max_length = 100]
        category -> Nullable<Varchar>,
        /// Required skills.
        required_skills -> Array<Text>,
        /// Assigned freelancer, set iff status is not `open`.
        freelancer_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
