use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Gigs {
    Table,
    OwnerId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Bids {
    Table,
    GigId,
    FreelancerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    UserId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One bid per freelancer per gig.
        manager
            .create_index(
                Index::create()
                    .name("idx_bids_gig_freelancer_unique")
                    .table(Bids::Table)
                    .col(Bids::GigId)
                    .col(Bids::FreelancerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Bids for a gig in submission order
        manager
            .create_index(
                Index::create()
                    .name("idx_bids_gig_id_created_at")
                    .table(Bids::Table)
                    .col(Bids::GigId)
                    .col(Bids::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bids_freelancer_id")
                    .table(Bids::Table)
                    .col(Bids::FreelancerId)
                    .to_owned(),
            )
            .await?;

        // Gig browser filters by status, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_gigs_status_created_at")
                    .table(Gigs::Table)
                    .col(Gigs::Status)
                    .col(Gigs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_gigs_owner_id")
                    .table(Gigs::Table)
                    .col(Gigs::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_user_id_created_at")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_notifications_user_id_created_at",
            "idx_gigs_owner_id",
            "idx_gigs_status_created_at",
            "idx_bids_freelancer_id",
            "idx_bids_gig_id_created_at",
            "idx_bids_gig_freelancer_unique",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
