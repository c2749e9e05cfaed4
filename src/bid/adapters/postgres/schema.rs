//! Diesel schema for bids.

diesel::table! {
    /// Bids placed by freelancers on tasks.
    bids (id) {
        /// Bid identifier.
        id -> Uuid,
        /// Targeted task.
        task_id -> Uuid,
        /// Bidding freelancer; unique together with `task_id`.
        freelancer_id -> Uuid,
        /// Offered amount, strictly positive.
        amount -> Float8,
        /// Proposed delivery deadline.
        proposed_deadline -> Timestamptz,
        /// Cover letter.
        cover_letter -> Text,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
