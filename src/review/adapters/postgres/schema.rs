//! Diesel schema for reviews.

diesel::table! {
    /// Reviews written on completed tasks.
    reviews (id) {
        /// Review identifier.
        id -> Uuid,
        /// Reviewed task.
        task_id -> Uuid,
        /// Author.
        reviewer_id -> Uuid,
        /// Subject whose rating aggregates this review.
        reviewed_user_id -> Uuid,
        /// Score in `1..=5`.
        rating -> Int2,
        /// Free-text comment.
        comment -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
