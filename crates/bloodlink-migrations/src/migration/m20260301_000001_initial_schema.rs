use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========================================
        // BLOOD_REQUESTS TABLE
        // ========================================
        manager
            .create_table(
                Table::create()
                    .table(BloodRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BloodRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BloodRequests::RequesterId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BloodRequests::RequesterEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BloodRequests::PatientName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BloodRequests::RequiredBloodGroup)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BloodRequests::UnitsRequired)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BloodRequests::HospitalName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BloodRequests::HospitalLocation)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(BloodRequests::Urgency).string().not_null())
                    .col(
                        ColumnDef::new(BloodRequests::ContactPerson)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BloodRequests::ContactNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BloodRequests::AdditionalInfo).text().null())
                    .col(
                        ColumnDef::new(BloodRequests::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(BloodRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blood_requests_status")
                    .table(BloodRequests::Table)
                    .col(BloodRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blood_requests_created_at")
                    .table(BloodRequests::Table)
                    .col(BloodRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ========================================
        // DONORS TABLE
        // ========================================
        manager
            .create_table(
                Table::create()
                    .table(Donors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Donors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Donors::UserId).string().not_null())
                    .col(ColumnDef::new(Donors::Email).string().null())
                    .col(ColumnDef::new(Donors::FullName).string().not_null())
                    .col(ColumnDef::new(Donors::BloodGroup).string().not_null())
                    .col(ColumnDef::new(Donors::PhoneNumber).string().not_null())
                    .col(
                        ColumnDef::new(Donors::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Donors::IsProfileActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Donors::IsVerified).boolean().null())
                    .col(ColumnDef::new(Donors::ShowContact).boolean().null())
                    .col(
                        ColumnDef::new(Donors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Donors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite index covering the donor-matching query
        manager
            .create_index(
                Index::create()
                    .name("idx_donors_matching")
                    .table(Donors::Table)
                    .col(Donors::BloodGroup)
                    .col(Donors::IsAvailable)
                    .col(Donors::IsProfileActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_donors_user_id")
                    .table(Donors::Table)
                    .col(Donors::UserId)
                    .to_owned(),
            )
            .await?;

        // ========================================
        // MAIL TABLE (outbound queue)
        // ========================================
        manager
            .create_table(
                Table::create()
                    .table(Mail::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Mail::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Mail::ToAddress).string().not_null())
                    .col(ColumnDef::new(Mail::Subject).string().not_null())
                    .col(ColumnDef::new(Mail::HtmlBody).text().not_null())
                    .col(ColumnDef::new(Mail::TextBody).text().not_null())
                    .col(
                        ColumnDef::new(Mail::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_mail_created_at")
                    .table(Mail::Table)
                    .col(Mail::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Mail::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Donors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BloodRequests::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum BloodRequests {
    Table,
    Id,
    RequesterId,
    RequesterEmail,
    PatientName,
    RequiredBloodGroup,
    UnitsRequired,
    HospitalName,
    HospitalLocation,
    Urgency,
    ContactPerson,
    ContactNumber,
    AdditionalInfo,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Donors {
    Table,
    Id,
    UserId,
    Email,
    FullName,
    BloodGroup,
    PhoneNumber,
    IsAvailable,
    IsProfileActive,
    IsVerified,
    ShowContact,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Mail {
    Table,
    Id,
    ToAddress,
    Subject,
    HtmlBody,
    TextBody,
    CreatedAt,
}
