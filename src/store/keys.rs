use super::slice::Keyed;
use crate::domain::{
    Address, AdminUser, Category, Material, PortfolioCategory, PortfolioProject, ProductListItem,
    Project, QuotationRequest, ServiceBooking, StaffProfile, StoreService,
};

macro_rules! keyed_by_id {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Keyed for $ty {
                type Key = i64;

                fn key(&self) -> i64 {
                    self.id
                }
            }
        )*
    };
}

keyed_by_id!(
    Address,
    AdminUser,
    Category,
    Material,
    PortfolioCategory,
    Project,
    QuotationRequest,
    ServiceBooking,
    StaffProfile,
    StoreService,
);

impl Keyed for ProductListItem {
    type Key = String;

    fn key(&self) -> String {
        self.slug.clone()
    }
}

impl Keyed for PortfolioProject {
    type Key = String;

    fn key(&self) -> String {
        self.slug.clone()
    }
}
