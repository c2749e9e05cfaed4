//! Diesel schema for user accounts.

diesel::table! {
    /// Marketplace user accounts.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Normalised email address, unique.
        #[max_length = 320]
        email -> Varchar,
        /// First name.
        #[max_length = 255]
        first_name -> Varchar,
        /// Last name.
        #[max_length = 255]
        last_name -> Varchar,
        /// Account role.
        #[max_length = 20]
        role -> Varchar,
        /// Optional biography.
        bio -> Nullable<Text>,
        /// Optional profile image reference.
        profile_image -> Nullable<Text>,
        /// Declared skills.
        skills -> Array<Text>,
        /// Running review rating.
        rating -> Float8,
        /// Verification flag.
        is_verified -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
