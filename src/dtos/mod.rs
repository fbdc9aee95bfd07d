pub mod orderdtos;
