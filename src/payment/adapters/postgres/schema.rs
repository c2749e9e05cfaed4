//! Diesel schema for payment records.

diesel::table! {
    /// Payments recorded against assigned tasks.
    payments (id) {
        /// Payment identifier.
        id -> Uuid,
        /// Task paid for.
        task_id -> Uuid,
        /// Paying client, copied from the task.
        client_id -> Uuid,
        /// Paid freelancer, copied from the task.
        freelancer_id -> Uuid,
        /// Amount, strictly positive.
        amount -> Float8,
        /// Settlement status.
        #[max_length = 20]
        status -> Varchar,
        /// Payment method.
        #[max_length = 50]
        payment_method -> Varchar,
        /// Processor transaction reference.
        #[max_length = 255]
        transaction_id -> Nullable<Varchar>,
        /// Gateway label.
        #[max_length = 50]
        payment_gateway -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
